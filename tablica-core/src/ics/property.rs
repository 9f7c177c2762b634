//! Property lines and the properties we care about.

/// Properties read from a `VEVENT`. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Summary,
    DtStart,
    DtEnd,
    Description,
    Location,
    Uid,
}

impl PropertyKind {
    /// Map a property name to its kind. Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SUMMARY" => Some(PropertyKind::Summary),
            "DTSTART" => Some(PropertyKind::DtStart),
            "DTEND" => Some(PropertyKind::DtEnd),
            "DESCRIPTION" => Some(PropertyKind::Description),
            "LOCATION" => Some(PropertyKind::Location),
            "UID" => Some(PropertyKind::Uid),
            _ => None,
        }
    }
}

/// A `NAME;PARAM=VALUE:value` line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine<'l> {
    pub name: &'l str,
    params: &'l str,
    pub value: &'l str,
}

impl<'l> ContentLine<'l> {
    /// Split on the first colon; the value keeps any further colons.
    /// Lines without a colon are not property lines.
    pub fn parse(line: &'l str) -> Option<Self> {
        let (key, value) = line.split_once(':')?;
        let (name, params) = key.split_once(';').unwrap_or((key, ""));
        Some(ContentLine {
            name,
            params,
            value,
        })
    }

    pub fn kind(&self) -> Option<PropertyKind> {
        PropertyKind::from_name(self.name)
    }

    /// Value of parameter `key` (case-insensitive), without surrounding quotes.
    pub fn param(&self, key: &str) -> Option<&'l str> {
        self.params
            .split(';')
            .filter_map(|param| param.split_once('='))
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.trim_matches('"'))
    }
}

/// Decode TEXT escapes. The backslash rule runs last so it cannot
/// re-trigger the others.
pub fn unescape_text(value: &str) -> String {
    value
        .replace("\\n", "\n")
        .replace("\\,", ",")
        .replace("\\;", ";")
        .replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_keeps_colons() {
        let line = ContentLine::parse("LOCATION:Sala 3: parter").unwrap();
        assert_eq!(line.name, "LOCATION");
        assert_eq!(line.value, "Sala 3: parter");
    }

    #[test]
    fn test_params_are_split_from_name() {
        let line =
            ContentLine::parse("DTSTART;TZID=\"Europe/Warsaw\";X-A=1:20240115T143000").unwrap();
        assert_eq!(line.kind(), Some(PropertyKind::DtStart));
        assert_eq!(line.param("tzid"), Some("Europe/Warsaw"));
        assert_eq!(line.param("VALUE"), None);
        assert_eq!(line.value, "20240115T143000");
    }

    #[test]
    fn test_names_match_exactly() {
        assert_eq!(PropertyKind::from_name("summary"), None);
        assert_eq!(PropertyKind::from_name("X-WR-CALNAME"), None);
        assert!(ContentLine::parse("no colon here").is_none());
    }

    #[test]
    fn test_unescape_order() {
        assert_eq!(
            unescape_text("Line1\\nLine2\\, and more"),
            "Line1\nLine2, and more"
        );
        assert_eq!(unescape_text("a\\;b\\\\c"), "a;b\\c");
    }
}
