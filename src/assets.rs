//! Visual assets the game needs before a session may start
//!
//! Image decoding is the browser's job; the game only tracks which sprites
//! have reported a size and refuses to start until all required ones have.

use std::fmt;

/// Sprites the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    /// The player's bird
    Avatar,
    /// Banner on the game-over screen
    GameOver,
}

impl Sprite {
    pub const ALL: [Sprite; 2] = [Sprite::Avatar, Sprite::GameOver];

    /// Served path
    pub fn path(self) -> &'static str {
        match self {
            Sprite::Avatar => "/images/BabyBobo-Flying.png",
            Sprite::GameOver => "/images/gameover.png",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Sprite::Avatar => "avatar",
            Sprite::GameOver => "game over banner",
        }
    }
}

/// Natural pixel size of a decoded sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// The browser failed to fetch or decode the image
    LoadFailed { name: &'static str },
    /// The image decoded to zero pixels
    EmptySprite { name: &'static str },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::LoadFailed { name } => write!(f, "failed to load {}", name),
            AssetError::EmptySprite { name } => write!(f, "{} has no pixels", name),
        }
    }
}

impl std::error::Error for AssetError {}

/// Load state of every sprite
#[derive(Debug, Clone, Default)]
pub struct SpriteSheet {
    avatar: Option<SpriteSize>,
    game_over: Option<SpriteSize>,
    failed: Option<AssetError>,
}

impl SpriteSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decoded sprite
    pub fn loaded(&mut self, sprite: Sprite, width: f32, height: f32) -> Result<SpriteSize, AssetError> {
        if width <= 0.0 || height <= 0.0 {
            let err = AssetError::EmptySprite { name: sprite.name() };
            self.failed = Some(err.clone());
            return Err(err);
        }
        let size = SpriteSize { width, height };
        match sprite {
            Sprite::Avatar => self.avatar = Some(size),
            Sprite::GameOver => self.game_over = Some(size),
        }
        log::info!("Loaded {} ({}x{})", sprite.name(), width, height);
        Ok(size)
    }

    /// Record a load failure. Sticky: the sheet never becomes ready afterwards.
    pub fn failed(&mut self, sprite: Sprite) -> AssetError {
        let err = AssetError::LoadFailed { name: sprite.name() };
        log::error!("{}", err);
        self.failed = Some(err.clone());
        err
    }

    pub fn size(&self, sprite: Sprite) -> Option<SpriteSize> {
        match sprite {
            Sprite::Avatar => self.avatar,
            Sprite::GameOver => self.game_over,
        }
    }

    pub fn error(&self) -> Option<&AssetError> {
        self.failed.as_ref()
    }

    /// Every sprite loaded and nothing failed
    pub fn ready(&self) -> bool {
        self.failed.is_none() && Sprite::ALL.iter().all(|s| self.size(*s).is_some())
    }
}
