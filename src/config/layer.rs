use std::fmt;

/// A configuration layer. Higher ranks override lower ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Defaults,
    User,
    Forced,
}

impl Layer {
    /// All layers, lowest precedence first.
    pub const ALL: [Layer; 3] = [Layer::Defaults, Layer::User, Layer::Forced];

    pub fn rank(self) -> u8 {
        match self {
            Layer::Defaults => 0,
            Layer::User => 1,
            Layer::Forced => 2,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Defaults => "defaults",
            Layer::User => "user",
            Layer::Forced => "forced",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        let ranks: Vec<u8> = Layer::ALL.iter().map(|layer| layer.rank()).collect();
        assert_eq!(ranks, [0, 1, 2]);
        assert!(Layer::Forced > Layer::User && Layer::User > Layer::Defaults);
    }

    #[test]
    fn test_display() {
        assert_eq!(Layer::Forced.to_string(), "forced");
    }
}
