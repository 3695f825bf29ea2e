//! `Link` header parsing.
//!
//! Hubs advertise themselves and the topic URL of a notification through link
//! relations: `Link: <https://hub.example/>; rel="hub", <https://blog.example/feed>; rel="self"`.
//! Only the target and the `rel` parameter are kept.

/// One `<target>; rel="..."` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub target: String,
    /// Relation types, a single `rel` may carry several separated by spaces
    pub rels: Vec<String>,
}

impl Link {
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parse one `Link` header value into its entries.
///
/// Entries without a `<...>` target are skipped. Commas inside the target or
/// inside quoted parameter values do not split entries.
pub fn parse(value: &str) -> Vec<Link> {
    let mut links = Vec::new();
    let mut rest = value;

    while let Some(start) = rest.find('<') {
        let after_open = &rest[start + 1..];
        let Some(end) = after_open.find('>') else {
            break;
        };

        let target = after_open[..end].trim().to_string();
        let (params, next) = split_unquoted(&after_open[end + 1..], ',');
        links.push(Link {
            target,
            rels: rel_types(params),
        });
        rest = next;
    }

    links
}

/// Target of the first link carrying `rel`.
pub fn find<'a>(links: &'a [Link], rel: &str) -> Option<&'a str> {
    links
        .iter()
        .find(|link| link.has_rel(rel))
        .map(|link| link.target.as_str())
}

/// Split at the first `sep` that is not inside a quoted string.
fn split_unquoted(s: &str, sep: char) -> (&str, &str) {
    let mut quoted = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            c if c == sep && !quoted => return (&s[..i], &s[i + c.len_utf8()..]),
            _ => {}
        }
    }
    (s, "")
}

/// `;`-separated parameters, ignoring separators inside quoted values.
fn params(mut rest: &str) -> Vec<&str> {
    let mut params = Vec::new();
    while !rest.is_empty() {
        let (param, next) = split_unquoted(rest, ';');
        params.push(param);
        rest = next;
    }
    params
}

fn rel_types(list: &str) -> Vec<String> {
    params(list)
        .into_iter()
        .filter_map(|param| param.split_once('='))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("rel"))
        .flat_map(|(_, value)| {
            value
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
