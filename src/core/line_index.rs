/// Byte offsets at which each line of a text starts.
///
/// Line 1 starts at offset 0, line 2 starts after the first '\n', etc.
#[derive(Debug, Clone)]
pub struct LineIndex {
    offsets: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut offsets = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                offsets.push(i + 1);
            }
        }
        Self { offsets }
    }

    /// 1-based line number containing `offset`, found by binary search.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.offsets.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(1), 1);
        assert_eq!(index.line_of(2), 1);
        assert_eq!(index.line_of(3), 2);
        assert_eq!(index.line_of(6), 3);
        assert_eq!(index.line_of(7), 4);
        assert_eq!(index.line_of(8), 4);
    }
}
