pub type NebulaResult<T> = Result<T, NebulaError>;

#[derive(thiserror::Error, Debug)]
pub enum NebulaError {
    #[error("config error: {0}")]
    Config(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("color error: {0}")]
    Color(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NebulaError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn color(msg: impl Into<String>) -> Self {
        Self::Color(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(NebulaError::config("x").to_string().contains("config error:"));
        assert!(
            NebulaError::animation("x")
                .to_string()
                .contains("animation error:")
        );
        assert!(NebulaError::color("x").to_string().contains("color error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = NebulaError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
