//! Scanning server-rendered HTML fragments.
//!
//! The save endpoint answers with a rendered bookmark list. Only the first
//! `<li>` of it is spliced into the page, so this module locates that element
//! in the raw markup without building a tree. It follows the parts of the HTML
//! parsing rules that matter for list items: comments, quoted attribute values,
//! raw text elements and implicitly closed `<li>`s.

/// Elements whose content is not markup.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

const LIST_ELEMENTS: [&str; 3] = ["ul", "ol", "menu"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
}

#[derive(Debug)]
struct Tag {
    name: String,
    kind: TagKind,
    /// Byte offset of `<`.
    start: usize,
    /// Byte offset just past `>`.
    end: usize,
}

impl Tag {
    fn opens(&self, names: &[&str]) -> bool {
        self.kind == TagKind::Open && names.contains(&self.name.as_str())
    }

    fn closes(&self, names: &[&str]) -> bool {
        self.kind == TagKind::Close && names.contains(&self.name.as_str())
    }
}

struct Tags<'a> {
    html: &'a str,
    position: usize,
}

impl<'a> Tags<'a> {
    fn new(html: &'a str) -> Self {
        Self { html, position: 0 }
    }

    fn skip_past(&mut self, needle: &str) {
        self.position = match self.html[self.position..].find(needle) {
            Some(offset) => self.position + offset + needle.len(),
            None => self.html.len(),
        };
    }

    fn skip_raw_text(&mut self, name: &str) {
        let closing = format!("</{name}");
        let rest = self.html[self.position..].to_ascii_lowercase();
        self.position = match rest.find(&closing) {
            Some(offset) => self.position + offset,
            None => self.html.len(),
        };
    }

    /// Reads the tag starting at `start`, or `None` when `<` starts plain text.
    fn read_tag(&mut self, start: usize) -> Option<Tag> {
        let bytes = self.html.as_bytes();
        let mut cursor = start + 1;
        let kind_is_close = bytes.get(cursor) == Some(&b'/');
        if kind_is_close {
            cursor += 1;
        }
        if !bytes.get(cursor).is_some_and(u8::is_ascii_alphabetic) {
            return None;
        }
        let name_start = cursor;
        while bytes
            .get(cursor)
            .is_some_and(|byte| byte.is_ascii_alphanumeric() || *byte == b'-')
        {
            cursor += 1;
        }
        let name = self.html[name_start..cursor].to_ascii_lowercase();

        let mut quote = None;
        while let Some(&byte) = bytes.get(cursor) {
            match (quote, byte) {
                (Some(open), byte) if byte == open => quote = None,
                (None, b'"' | b'\'') => quote = Some(byte),
                (None, b'>') => break,
                _ => {}
            }
            cursor += 1;
        }
        let end = (cursor + 1).min(self.html.len());
        // A trailing `/` does not close non-void elements such as `li`.
        let kind = if kind_is_close {
            TagKind::Close
        } else {
            TagKind::Open
        };
        Some(Tag {
            name,
            kind,
            start,
            end,
        })
    }
}

impl Iterator for Tags<'_> {
    type Item = Tag;

    fn next(&mut self) -> Option<Tag> {
        loop {
            let start = self.position + self.html[self.position..].find('<')?;
            let rest = &self.html[start..];
            if rest.starts_with("<!--") {
                self.position = start + 4;
                self.skip_past("-->");
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                self.position = start + 2;
                self.skip_past(">");
                continue;
            }
            let Some(tag) = self.read_tag(start) else {
                self.position = start + 1;
                continue;
            };
            self.position = tag.end;
            if tag.opens(&RAW_TEXT_ELEMENTS) {
                self.skip_raw_text(&tag.name);
            }
            return Some(tag);
        }
    }
}

/// Returns the markup of the first `<li>` element in `html`, nested lists included.
///
/// An `<li>` ends at its own `</li>`, at the next sibling `<li>`, at the end of
/// its parent list, or at the end of the input, whichever comes first.
pub fn first_list_item(html: &str) -> Option<&str> {
    let mut tags = Tags::new(html);
    let opening = tags.by_ref().find(|tag| tag.opens(&["li"]))?;

    let mut nested_lists = 0usize;
    for tag in tags {
        if nested_lists == 0 {
            if tag.closes(&["li"]) {
                return Some(&html[opening.start..tag.end]);
            }
            if tag.opens(&["li"]) || tag.closes(&LIST_ELEMENTS) {
                return Some(html[opening.start..tag.start].trim_end());
            }
        }
        if tag.opens(&LIST_ELEMENTS) {
            nested_lists += 1;
        } else if tag.closes(&LIST_ELEMENTS) {
            nested_lists -= 1;
        }
    }
    Some(html[opening.start..].trim_end())
}
