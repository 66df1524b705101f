use serde::Deserialize;

/// Body of `GET /me/player/currently-playing`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub item: Option<Track>,
    #[serde(default)]
    pub is_playing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Option<Album>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

/// What the player is doing right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NowPlaying {
    /// Nothing is playing (HTTP 204, or a body without an item).
    Nothing,
    Track(TrackView),
}

impl NowPlaying {
    /// Last known playing flag; `false` when nothing is playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Track(t) if t.is_playing)
    }
}

impl From<CurrentlyPlaying> for NowPlaying {
    fn from(current: CurrentlyPlaying) -> Self {
        match current.item {
            Some(track) => Self::Track(TrackView::new(track, current.is_playing)),
            None => Self::Nothing,
        }
    }
}

/// Display-ready track summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackView {
    pub name: String,
    pub artists: String,
    pub album: Option<String>,
    pub cover_url: Option<String>,
    pub is_playing: bool,
}

impl TrackView {
    fn new(track: Track, is_playing: bool) -> Self {
        let artists = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let (album, cover_url) = match track.album {
            Some(album) => {
                let cover = album.images.into_iter().next().map(|i| i.url);
                (Some(album.name), cover)
            }
            None => (None, None),
        };

        Self {
            name: track.name,
            artists,
            album,
            cover_url,
            is_playing,
        }
    }
}

impl std::fmt::Display for TrackView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.is_playing { "playing" } else { "paused" };
        write!(f, "[{status}] {}", self.name)?;
        if !self.artists.is_empty() {
            write!(f, " | {}", self.artists)?;
        }
        if let Some(album) = &self.album {
            write!(f, " | {album}")?;
        }
        Ok(())
    }
}
