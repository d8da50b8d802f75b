//! Tree records: one exported class and its (optional) type tree.
//!
//! ```text
//! // classID{1}: GameObject <- EditorExtension <- Object
//! 	GameObject Base // ByteSize{ffffffff}, Index{0}, Version{5}, IsArray{0}, MetaFlag{8000}
//! 		vector m_Component // ByteSize{ffffffff}, Index{1}, Version{1}, IsArray{0}, MetaFlag{8041}
//! ```
//!
//! A record whose class line is not followed by any node line is the
//! placeholder left behind by a failed export and is reported as invalid.

use std::sync::Arc;

use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::{DumpError, Result};

/// One field of a type tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeTreeNode {
    pub type_name: Arc<str>,
    pub name: Arc<str>,
    /// -1 for variable-sized fields.
    pub byte_size: i32,
    pub index: u32,
    pub version: u32,
    pub is_array: bool,
    pub meta_flag: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TypeTreeNode>,
}

impl TypeTreeNode {
    /// Pre-order traversal paired with each node's depth (root = 0).
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

pub struct Walk<'a> {
    stack: Vec<(usize, &'a TypeTreeNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a TypeTreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

/// One class as exported into the dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRecord {
    pub class_id: u32,
    pub class_name: String,
    /// Nearest base first.
    pub base_classes: Vec<String>,
    pub root: Option<TypeTreeNode>,
    /// Line of the `// classID{..}` header.
    pub line: u32,
}

impl TreeRecord {
    pub fn is_valid(&self) -> bool {
        self.root.is_some()
    }

    /// Parse exactly one record starting at the committed position, leaving
    /// the cursor at the start of whatever follows it.
    pub fn read(cursor: &mut Cursor<'_>) -> Result<TreeRecord> {
        let open = cursor.find_validate_word("//")?;
        cursor.validate_word("classID")?;
        let class_id = cursor.read_braced_integer()?;
        let class_id = u32::try_from(class_id).map_err(|_| DumpError::MalformedInteger {
            text: class_id.to_string(),
            line: open.line,
        })?;
        cursor.validate_word(":")?;
        let class_name = cursor.read_word()?.text.to_owned();

        let mut base_classes = Vec::new();
        while !cursor.at_end_of_line() {
            cursor.validate_word("<-")?;
            base_classes.push(cursor.read_word()?.text.to_owned());
        }
        cursor.advance_to_next_line();

        let root = match next_line(cursor)? {
            NextLine::Node(indent) => {
                let root = read_node(cursor, indent)?;
                // Only one root per record; anything else must start a new comment line.
                if let NextLine::Node(_) = next_line(cursor)? {
                    cursor.find_validate_word("//")?;
                }
                Some(root)
            }
            NextLine::Comment | NextLine::End => None,
        };

        Ok(TreeRecord {
            class_id,
            class_name,
            base_classes,
            root,
            line: open.line,
        })
    }
}

enum NextLine {
    Node(usize),
    Comment,
    End,
}

/// Classify the next content line without consuming it.
fn next_line(cursor: &mut Cursor<'_>) -> Result<NextLine> {
    cursor.peek(|c| {
        if !c.find_content() {
            return Ok(NextLine::End);
        }
        let indent = c.indent();
        if c.read_word()?.is("//") {
            Ok(NextLine::Comment)
        } else {
            Ok(NextLine::Node(indent))
        }
    })
}

fn read_node(cursor: &mut Cursor<'_>, indent: usize) -> Result<TypeTreeNode> {
    cursor.find_content();
    let line = cursor.line();
    let found = cursor.indent();
    if found != indent {
        return Err(DumpError::InvalidIndentation {
            line,
            expected: indent,
            found,
        });
    }

    let mut words = Vec::new();
    loop {
        let word = cursor.read_word()?;
        if word.is("//") {
            break;
        }
        words.push(word.text);
    }
    let (name, type_words) = match words.split_last() {
        Some((name, type_words)) if !type_words.is_empty() => (*name, type_words),
        _ => {
            return Err(DumpError::UnexpectedToken {
                expected: "<type> <name>".to_owned(),
                actual: words.join(" "),
                line,
            })
        }
    };

    cursor.validate_word("ByteSize")?;
    let byte_size = cursor.read_braced_hex()? as i32;
    cursor.validate_word(",")?;
    cursor.validate_word("Index")?;
    let index = braced_u32(cursor, line)?;
    cursor.validate_word(",")?;
    cursor.validate_word("Version")?;
    let version = braced_u32(cursor, line)?;
    cursor.validate_word(",")?;
    cursor.validate_word("IsArray")?;
    let is_array = match cursor.read_braced_integer()? {
        0 => false,
        1 => true,
        other => {
            return Err(DumpError::UnexpectedToken {
                expected: "0 or 1".to_owned(),
                actual: other.to_string(),
                line,
            })
        }
    };
    cursor.validate_word(",")?;
    cursor.validate_word("MetaFlag")?;
    let meta_flag = cursor.read_braced_hex()?;
    cursor.expect_end_of_line()?;
    cursor.advance_to_next_line();

    let mut children = Vec::new();
    while let NextLine::Node(child_indent) = next_line(cursor)? {
        if child_indent <= indent {
            break;
        }
        if child_indent != indent + 1 {
            cursor.find_content();
            return Err(DumpError::InvalidIndentation {
                line: cursor.line(),
                expected: indent + 1,
                found: child_indent,
            });
        }
        children.push(read_node(cursor, child_indent)?);
    }

    Ok(TypeTreeNode {
        type_name: Arc::from(type_words.join(" ")),
        name: Arc::from(name),
        byte_size,
        index,
        version,
        is_array,
        meta_flag,
        children,
    })
}

fn braced_u32(cursor: &mut Cursor<'_>, line: u32) -> Result<u32> {
    let n = cursor.read_braced_integer()?;
    u32::try_from(n).map_err(|_| DumpError::MalformedInteger {
        text: n.to_string(),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_OBJECT: &str = "\
// classID{1}: GameObject <- EditorExtension <- Object
\tGameObject Base // ByteSize{ffffffff}, Index{0}, Version{5}, IsArray{0}, MetaFlag{8000}
\t\tvector m_Component // ByteSize{ffffffff}, Index{1}, Version{1}, IsArray{0}, MetaFlag{8041}
\t\t\tArray Array // ByteSize{ffffffff}, Index{2}, Version{1}, IsArray{1}, MetaFlag{4041}
\t\tunsigned int m_Layer // ByteSize{4}, Index{3}, Version{1}, IsArray{0}, MetaFlag{0}
// classID{2}: Component <- EditorExtension <- Object
";

    #[test]
    fn parses_class_line_and_tree() {
        let mut cursor = Cursor::new(GAME_OBJECT);
        let record = TreeRecord::read(&mut cursor).unwrap();
        assert_eq!(record.class_id, 1);
        assert_eq!(record.class_name, "GameObject");
        assert_eq!(record.base_classes, vec!["EditorExtension", "Object"]);
        assert_eq!(record.line, 1);
        assert!(record.is_valid());

        let root = record.root.as_ref().unwrap();
        assert_eq!(&*root.type_name, "GameObject");
        assert_eq!(&*root.name, "Base");
        assert_eq!(root.byte_size, -1);
        assert_eq!(root.version, 5);
        assert_eq!(root.meta_flag, 0x8000);
        assert_eq!(root.children.len(), 2);
        assert_eq!(&*root.children[1].type_name, "unsigned int");
        assert_eq!(root.children[1].byte_size, 4);
        assert!(root.children[0].children[0].is_array);
        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn stops_before_next_record() {
        let mut cursor = Cursor::new(GAME_OBJECT);
        TreeRecord::read(&mut cursor).unwrap();
        let next = TreeRecord::read(&mut cursor).unwrap();
        assert_eq!(next.class_name, "Component");
        assert_eq!(next.line, 6);
        assert!(!next.is_valid());
        assert!(!cursor.find_content());
    }

    #[test]
    fn walk_is_preorder_with_depth() {
        let mut cursor = Cursor::new(GAME_OBJECT);
        let record = TreeRecord::read(&mut cursor).unwrap();
        let names: Vec<(usize, &str)> = record
            .root
            .as_ref()
            .unwrap()
            .walk()
            .map(|(d, n)| (d, &*n.name))
            .collect();
        assert_eq!(
            names,
            vec![(0, "Base"), (1, "m_Component"), (2, "Array"), (1, "m_Layer")]
        );
    }

    #[test]
    fn record_without_base_classes() {
        let mut cursor = Cursor::new("// classID{0}: Object\n");
        let record = TreeRecord::read(&mut cursor).unwrap();
        assert!(record.base_classes.is_empty());
        assert!(!record.is_valid());
    }

    #[test]
    fn skipped_indentation_level_fails() {
        let src = "\
// classID{1}: A
\tA Base // ByteSize{4}, Index{0}, Version{1}, IsArray{0}, MetaFlag{0}
\t\t\tint x // ByteSize{4}, Index{1}, Version{1}, IsArray{0}, MetaFlag{0}
";
        let mut cursor = Cursor::new(src);
        match TreeRecord::read(&mut cursor) {
            Err(DumpError::InvalidIndentation {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected InvalidIndentation, got {:?}", other),
        }
    }

    #[test]
    fn second_root_is_rejected() {
        let src = "\
// classID{1}: A
\tA Base // ByteSize{4}, Index{0}, Version{1}, IsArray{0}, MetaFlag{0}
\tA Other // ByteSize{4}, Index{0}, Version{1}, IsArray{0}, MetaFlag{0}
";
        let mut cursor = Cursor::new(src);
        match TreeRecord::read(&mut cursor) {
            Err(DumpError::UnexpectedToken { expected, line, .. }) => {
                assert_eq!(expected, "//");
                assert_eq!(line, 3);
            }
            other => panic!("expected UnexpectedToken, got {:?}", other),
        }
    }

    #[test]
    fn node_without_type_fails() {
        let src = "// classID{1}: A\n\tBase // ByteSize{4}, Index{0}, Version{1}, IsArray{0}, MetaFlag{0}\n";
        let mut cursor = Cursor::new(src);
        assert!(matches!(
            TreeRecord::read(&mut cursor),
            Err(DumpError::UnexpectedToken { line: 2, .. })
        ));
    }

    #[test]
    fn bad_is_array_flag_fails() {
        let src = "// classID{1}: A\n\tA Base // ByteSize{4}, Index{0}, Version{1}, IsArray{2}, MetaFlag{0}\n";
        let mut cursor = Cursor::new(src);
        assert!(matches!(
            TreeRecord::read(&mut cursor),
            Err(DumpError::UnexpectedToken { line: 2, .. })
        ));
    }

    #[test]
    fn malformed_byte_size_fails() {
        let src = "// classID{1}: A\n\tA Base // ByteSize{zz}, Index{0}, Version{1}, IsArray{0}, MetaFlag{0}\n";
        let mut cursor = Cursor::new(src);
        assert!(matches!(
            TreeRecord::read(&mut cursor),
            Err(DumpError::MalformedInteger { line: 2, .. })
        ));
    }
}
