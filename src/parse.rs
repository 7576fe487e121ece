// Filename parsing: identity and timestamp extraction
// Recording names follow `site-identity-YYYY-MM-DDThh_mm_ss±hh_mm.ext`.

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::constants::{DEFAULT_SITES, IDENTITY_SEPARATOR, TIMESTAMP_PATTERN};

/// Parsing configuration: the closed platform set and the token separator.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub sites: Vec<String>,
    pub separator: char,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            sites: DEFAULT_SITES.iter().map(|s| s.to_string()).collect(),
            separator: IDENTITY_SEPARATOR,
        }
    }
}

/// Pieces recovered from one recording filename.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    pub site: String,
    pub identity: String,
    pub timestamp: DateTime<FixedOffset>,
}

/// Filename parser with a precompiled timestamp pattern.
#[derive(Debug, Clone)]
pub struct IdentityParser {
    sites: Vec<String>,
    separator: char,
    timestamp_re: Regex,
}

impl IdentityParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            // Lowercased once so per-file matching is a plain comparison.
            sites: config.sites.iter().map(|s| s.to_lowercase()).collect(),
            separator: config.separator,
            timestamp_re: Regex::new(TIMESTAMP_PATTERN)
                .expect("timestamp pattern is a valid regex"),
        }
    }

    /// Parse a filename into site, identity and timestamp.
    ///
    /// Returns `None` when the name does not follow the convention: no
    /// timestamp token, fewer than two tokens before it, no known site
    /// token, or nothing left once the site token is removed. Callers count
    /// such files and move on; parsing never fails a scan.
    pub fn parse(&self, file_name: &str) -> Option<ParsedName> {
        let m = self.timestamp_re.find(file_name)?;
        let timestamp = parse_timestamp_token(m.as_str())?;

        let prefix = &file_name[..m.start()];
        let prefix = prefix.strip_suffix(self.separator).unwrap_or(prefix);
        if prefix.is_empty() {
            return None;
        }

        let tokens: Vec<&str> = prefix.split(self.separator).collect();
        if tokens.len() < 2 {
            return None;
        }

        let site_pos = tokens
            .iter()
            .position(|t| self.sites.iter().any(|s| *s == t.to_lowercase()))?;
        let site = tokens[site_pos].to_lowercase();

        let rest: Vec<&str> = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != site_pos)
            .map(|(_, t)| *t)
            .collect();
        if rest.is_empty() {
            return None;
        }

        Some(ParsedName {
            site,
            identity: rest.join(&self.separator.to_string()),
            timestamp,
        })
    }

    /// Extract just the timestamp, ignoring the identity convention.
    pub fn timestamp(&self, file_name: &str) -> Option<DateTime<FixedOffset>> {
        self.timestamp_re
            .find(file_name)
            .and_then(|m| parse_timestamp_token(m.as_str()))
    }
}

impl Default for IdentityParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

/// Parse one matched timestamp token. Underscores stand in for the colons
/// the filesystem would reject; restoring them yields RFC 3339.
pub fn parse_timestamp_token(token: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&token.replace('_', ":")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> IdentityParser {
        IdentityParser::default()
    }

    #[test]
    fn test_parse_simple_name() {
        let parsed = parser()
            .parse("twitch-alice-2025-06-26T15_09_46+09_00.mp4")
            .unwrap();
        assert_eq!(parsed.site, "twitch");
        assert_eq!(parsed.identity, "alice");
        assert_eq!(parsed.timestamp.to_rfc3339(), "2025-06-26T15:09:46+09:00");
    }

    #[test]
    fn test_round_trip_every_site() {
        let p = parser();
        for site in DEFAULT_SITES {
            let name = format!("{}-some_channel-2025-01-02T03_04_05+09_00.ts", site);
            let parsed = p.parse(&name).unwrap();
            assert_eq!(parsed.identity, "some_channel");
            assert_eq!(parsed.site, site.to_lowercase());
        }
    }

    #[test]
    fn test_multi_token_identity_rejoined() {
        let parsed = parser()
            .parse("chzzk-cool-name-2025-06-26T15_09_46+09_00.mkv")
            .unwrap();
        assert_eq!(parsed.identity, "cool-name");
    }

    #[test]
    fn test_site_match_is_case_insensitive() {
        let parsed = parser()
            .parse("TWITCH-alice-2025-06-26T15_09_46+09_00.mp4")
            .unwrap();
        assert_eq!(parsed.site, "twitch");
        assert_eq!(parsed.identity, "alice");
    }

    #[test]
    fn test_missing_timestamp_is_unparseable() {
        assert!(parser().parse("twitch-alice.mp4").is_none());
        assert!(parser().parse("notes.txt").is_none());
    }

    #[test]
    fn test_unknown_site_is_unparseable() {
        assert!(parser()
            .parse("someplace-alice-2025-06-26T15_09_46+09_00.mp4")
            .is_none());
    }

    #[test]
    fn test_site_alone_is_unparseable() {
        // Only one token before the timestamp.
        assert!(parser()
            .parse("twitch-2025-06-26T15_09_46+09_00.mp4")
            .is_none());
    }

    #[test]
    fn test_malformed_offset_rejected() {
        assert!(parser()
            .parse("twitch-alice-2025-06-26T15_09_46+0900.mp4")
            .is_none());
    }

    #[test]
    fn test_timestamp_extraction_without_identity() {
        let ts = parser().timestamp("junk 2025-06-26T15_09_46+09_00 junk");
        assert_eq!(ts.unwrap().to_rfc3339(), "2025-06-26T15:09:46+09:00");
        assert!(parser().timestamp("no timestamp here").is_none());
    }

    #[test]
    fn test_custom_site_set() {
        let p = IdentityParser::new(ParserConfig {
            sites: vec!["myrelay".to_string()],
            separator: '-',
        });
        let parsed = p.parse("myrelay-bob-2025-06-26T15_09_46+09_00.mp4").unwrap();
        assert_eq!(parsed.identity, "bob");
        assert!(p.parse("twitch-bob-2025-06-26T15_09_46+09_00.mp4").is_none());
    }
}
