//! Field paths for error reporting and logs

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Field(&'a str),
    Index(usize),
}

/// Path from the root to the node being visited, e.g. `shipping.items[2].sku`
///
/// Segments borrow field names from the specification, so tracking the path
/// costs nothing until it is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> FieldPath<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_field(&mut self, name: &'a str) {
        self.segments.push(Segment::Field(name));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if position == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
