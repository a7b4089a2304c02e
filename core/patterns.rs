#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Literal(&'a str),
    Group(Vec<&'a str>),
}

// Groups are flat: `{` runs to the next `}`. `{}` and an unterminated `{`
// stay literal.
pub fn expand_variable_patterns<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let mut expanded = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let segments = split_segments(path);
        if !segments.iter().any(|s| matches!(s, Segment::Group(_))) {
            expanded.push(path.to_string());
            continue;
        }

        let mut combinations = vec![String::new()];
        for segment in &segments {
            combinations = match segment {
                Segment::Literal(text) => combinations
                    .into_iter()
                    .map(|mut prefix| {
                        prefix.push_str(text);
                        prefix
                    })
                    .collect(),
                Segment::Group(options) => combinations
                    .iter()
                    .flat_map(|prefix| options.iter().map(move |opt| format!("{prefix}{opt}")))
                    .collect(),
            };
        }
        log::trace!("Expanded '{}' into {} path(s)", path, combinations.len());
        expanded.extend(combinations);
    }
    expanded
}

fn split_segments(path: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(open_rel) = path[cursor..].find('{') {
        let open = cursor + open_rel;
        let Some(close_rel) = path[open + 1..].find('}') else {
            break;
        };
        let close = open + 1 + close_rel;
        let inner = &path[open + 1..close];
        if inner.is_empty() {
            cursor = close + 1;
            continue;
        }
        if literal_start < open {
            segments.push(Segment::Literal(&path[literal_start..open]));
        }
        segments.push(Segment::Group(inner.split('|').map(str::trim).collect()));
        cursor = close + 1;
        literal_start = cursor;
    }

    if literal_start < path.len() {
        segments.push(Segment::Literal(&path[literal_start..]));
    }
    segments
}
