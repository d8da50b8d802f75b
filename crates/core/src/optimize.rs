//! String interning over a parsed forest.
//!
//! Dumps repeat the same handful of type and field names thousands of times
//! (`int`, `Array`, `m_Name`, ...). [`Dump::optimize`] rebuilds the forest so
//! equal names share one allocation. The result compares equal to the input.

use std::collections::HashSet;
use std::sync::Arc;

use crate::dump::Dump;
use crate::tree::{TreeRecord, TypeTreeNode};

#[derive(Default)]
struct Interner {
    strings: HashSet<Arc<str>>,
}

impl Interner {
    fn intern(&mut self, s: &Arc<str>) -> Arc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Arc::clone(existing);
        }
        self.strings.insert(Arc::clone(s));
        Arc::clone(s)
    }

    fn node(&mut self, node: &TypeTreeNode) -> TypeTreeNode {
        TypeTreeNode {
            type_name: self.intern(&node.type_name),
            name: self.intern(&node.name),
            byte_size: node.byte_size,
            index: node.index,
            version: node.version,
            is_array: node.is_array,
            meta_flag: node.meta_flag,
            children: node.children.iter().map(|c| self.node(c)).collect(),
        }
    }

    fn record(&mut self, record: &TreeRecord) -> TreeRecord {
        TreeRecord {
            class_id: record.class_id,
            class_name: record.class_name.clone(),
            base_classes: record.base_classes.clone(),
            root: record.root.as_ref().map(|r| self.node(r)),
            line: record.line,
        }
    }
}

impl Dump {
    /// Return a copy of this dump with all node strings interned.
    pub fn optimize(&self) -> Dump {
        let mut interner = Interner::default();
        let trees = self.trees.iter().map(|t| interner.record(t)).collect();
        tracing::debug!(
            unique_strings = interner.strings.len(),
            "optimized dump"
        );
        Dump {
            header: self.header.clone(),
            trees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "\
version: 2019.3.5f1
(SerializedFile)
// classID{1}: A
\tA Base // ByteSize{4}, Index{0}, Version{1}, IsArray{0}, MetaFlag{0}
\t\tint m_Value // ByteSize{4}, Index{1}, Version{1}, IsArray{0}, MetaFlag{0}
// classID{2}: B
\tB Base // ByteSize{4}, Index{0}, Version{1}, IsArray{0}, MetaFlag{0}
\t\tint m_Value // ByteSize{4}, Index{1}, Version{1}, IsArray{0}, MetaFlag{0}
// classID{3}: C
// ==================
// Successfully finished. Written 2 of 3
";

    fn child(dump: &Dump, i: usize) -> &TypeTreeNode {
        &dump.trees()[i].root.as_ref().unwrap().children[0]
    }

    #[test]
    fn optimized_dump_is_structurally_equal() {
        let dump = Dump::read_str(SRC).unwrap();
        let optimized = dump.optimize();
        assert_eq!(dump, optimized);
    }

    #[test]
    fn equal_names_share_one_allocation() {
        let dump = Dump::read_str(SRC).unwrap();
        assert!(!Arc::ptr_eq(&child(&dump, 0).name, &child(&dump, 1).name));

        let optimized = dump.optimize();
        assert!(Arc::ptr_eq(
            &child(&optimized, 0).name,
            &child(&optimized, 1).name
        ));
        assert!(Arc::ptr_eq(
            &child(&optimized, 0).type_name,
            &child(&optimized, 1).type_name
        ));
        let roots: Vec<_> = optimized
            .trees()
            .iter()
            .filter_map(|t| t.root.as_ref())
            .collect();
        assert!(Arc::ptr_eq(&roots[0].name, &roots[1].name));
    }

    #[test]
    fn original_is_untouched() {
        let dump = Dump::read_str(SRC).unwrap();
        let before = dump.clone();
        let _ = dump.optimize();
        assert_eq!(dump, before);
        assert!(!Arc::ptr_eq(&child(&dump, 0).name, &child(&dump, 1).name));
    }
}
