use std::fmt;
use std::str::FromStr;

/// Target container/codec produced by a codec adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EncodeFormat {
    Jpeg,
    Heic,
}

impl EncodeFormat {
    pub const ALL: [EncodeFormat; 2] = [EncodeFormat::Jpeg, EncodeFormat::Heic];

    pub fn as_str(&self) -> &'static str {
        match self {
            EncodeFormat::Jpeg => "JPEG",
            EncodeFormat::Heic => "HEIC",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            EncodeFormat::Jpeg => "jpg",
            EncodeFormat::Heic => "heic",
        }
    }
}

impl fmt::Display for EncodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodeFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(EncodeFormat::Jpeg),
            "heic" | "heif" => Ok(EncodeFormat::Heic),
            _ => Err(format!("unknown encode format: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("JPG".parse::<EncodeFormat>(), Ok(EncodeFormat::Jpeg));
        assert_eq!("jpeg".parse::<EncodeFormat>(), Ok(EncodeFormat::Jpeg));
        assert_eq!("heif".parse::<EncodeFormat>(), Ok(EncodeFormat::Heic));
        assert!("png".parse::<EncodeFormat>().is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        for format in EncodeFormat::ALL {
            assert_eq!(format.to_string(), format.as_str());
        }
    }
}
