use alloc::string::{String, ToString};
use core::fmt;

use super::StructType;

const INDENT: &str = "····";

impl StructType {
    /// Renders the field tree, one `id=N selector=S` line per field.
    ///
    /// Sub-fields follow their parent, indented by one `····` per level.
    #[inline]
    pub fn dump(&self) -> String {
        self.to_string()
    }

    /// Renders the subtree rooted at `id`, empty for an unknown id.
    pub fn dump_field(&self, id: usize) -> String {
        let mut out = String::new();
        if id < self.fields.len() {
            // Writing into a `String` never fails.
            let _ = self.write_tree(&mut out, &[id], 0);
        }
        out
    }

    fn write_tree(&self, w: &mut impl fmt::Write, ids: &[usize], level: usize) -> fmt::Result {
        for &id in ids {
            let field = &self.fields[id];
            for _ in 0..level {
                w.write_str(INDENT)?;
            }
            writeln!(w, "id={} selector={}", field.id(), field.selector())?;
            self.write_tree(w, field.children(), level + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, &self.tree, 0)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use vc_layout::derive::Record;
    use vc_layout::info::Typed;

    use crate::options::Options;
    use crate::shape::StructType;

    #[derive(Record, Default)]
    struct Leaf {
        n: u8,
    }

    #[derive(Record, Default)]
    struct Mid {
        leaf: Box<Leaf>,
        m: u8,
    }

    #[derive(Record, Default)]
    struct Top {
        mid: Mid,
        t: u8,
    }

    #[test]
    fn indented_tree() {
        let shape = StructType::analyze(Top::type_info().as_record().unwrap(), &Options::new());

        assert_eq!(
            shape.dump(),
            "id=0 selector=mid\n\
             ····id=2 selector=mid.leaf\n\
             ········id=4 selector=mid.leaf.n\n\
             ····id=3 selector=mid.m\n\
             id=1 selector=t\n",
        );
        assert_eq!(
            shape.dump_field(2),
            "id=2 selector=mid.leaf\n\
             ····id=4 selector=mid.leaf.n\n",
        );
        assert_eq!(shape.dump_field(42), "");
    }
}
