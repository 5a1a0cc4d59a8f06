use alloc::vec::Vec;

use log::{debug, warn};
use vc_layout::info::{RecordInfo, TypeInfo};
use vc_utils::hash::HashMap;

use super::StructType;
use crate::field::FieldType;
use crate::options::Options;
use crate::policy::PolicyFlags;

// -----------------------------------------------------------------------------
// Analyzer

struct Analyzer<'o> {
    options: &'o Options,
    fields: Vec<FieldType>,
    tree: Vec<usize>,
    depth: usize,
    truncated: bool,
}

impl Analyzer<'_> {
    /// Adds the members of `record` below `parent`, then expands the queued
    /// record members one by one.
    fn traverse(&mut self, record: &'static RecordInfo, parent: Option<usize>, depth: usize) {
        let max_depth = self.options.max_depth();
        if depth > max_depth {
            return;
        }

        let mut queued = Vec::new();

        for member in record.iter() {
            let field = FieldType::new(
                self.fields.len(),
                member,
                parent.map(|id| &self.fields[id]),
                depth,
            );
            let flags = self.options.policy_of(&field).flags();

            if flags.contains(PolicyFlags::INCLUDE) {
                let id = field.id;

                if flags.contains(PolicyFlags::EXPAND) && field.elem().is_record() {
                    if depth < max_depth {
                        queued.push(id);
                    } else {
                        self.truncated = true;
                    }
                }

                match parent {
                    Some(parent) => self.fields[parent].children.push(id),
                    None => self.tree.push(id),
                }
                self.fields.push(field);
                self.depth = self.depth.max(depth);
            }

            if flags.contains(PolicyFlags::HALT) {
                break;
            }
        }

        for id in queued {
            if let TypeInfo::Record(record) = self.fields[id].elem() {
                self.traverse(record, Some(id), depth + 1);
            }
        }
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    fn validate(&self) {
        for (index, field) in self.fields.iter().enumerate() {
            assert_eq!(field.id, index, "field ids must be dense");
            if let Some(parent) = field.parent {
                assert!(parent < field.id, "parents precede their children");
                assert!(self.fields[parent].children.contains(&field.id));
            } else {
                assert!(self.tree.contains(&field.id));
            }
            assert!(field.depth() <= self.options.max_depth());
        }
    }
}

impl StructType {
    /// Builds the shape of `record` under `options`.
    pub(crate) fn analyze(record: &'static RecordInfo, options: &Options) -> Self {
        let mut analyzer = Analyzer {
            options,
            fields: Vec::with_capacity(record.len()),
            tree: Vec::with_capacity(record.len()),
            depth: 0,
            truncated: false,
        };
        analyzer.traverse(record, None, 1);

        #[cfg(all(debug_assertions, feature = "debug"))]
        analyzer.validate();

        if analyzer.truncated {
            warn!(
                "`{}`: records nested deeper than {} are not expanded",
                record.ty(),
                options.max_depth(),
            );
        }

        let groups = match options.group_by() {
            Some(classify) => super::group::build(&analyzer.fields, classify.as_ref()),
            None => HashMap::default(),
        };

        debug!(
            "analyzed `{}`: {} fields, depth {}, {} groups",
            record.ty(),
            analyzer.fields.len(),
            analyzer.depth,
            groups.len(),
        );

        StructType {
            ty: *record.ty(),
            fields: analyzer.fields,
            tree: analyzer.tree,
            depth: analyzer.depth,
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use vc_layout::derive::Record;
    use vc_layout::info::{Kind, Typed};

    use crate::options::Options;
    use crate::policy::IterPolicy;
    use crate::shape::StructType;

    #[derive(Record, Default)]
    struct P1 {
        a: i32,
        b: i32,
        p2: P2,
    }

    #[derive(Record, Default)]
    struct P2 {
        c: i32,
        d: i32,
        p3: Option<Box<P3>>,
    }

    #[derive(Record, Default)]
    struct P3 {
        e: i32,
        f: Option<Box<i32>>,
        g: Option<Box<Option<Box<i32>>>>,
    }

    #[derive(Record, Default)]
    struct Node {
        value: u8,
        next: Option<Box<Node>>,
    }

    #[derive(Record, Default)]
    struct Wide {
        x: P3,
        y: u8,
        z: P3,
    }

    fn analyze<T: Typed>(options: &Options) -> StructType {
        StructType::analyze(T::type_info().as_record().unwrap(), options)
    }

    fn selectors(shape: &StructType) -> Vec<&str> {
        shape.fields().iter().map(|f| f.selector()).collect()
    }

    #[test]
    fn nested_ids() {
        let shape = analyze::<P1>(&Options::new());

        assert_eq!(
            selectors(&shape),
            ["a", "b", "p2", "p2.c", "p2.d", "p2.p3", "p2.p3.e", "p2.p3.f", "p2.p3.g"],
        );
        for (id, field) in shape.fields().iter().enumerate() {
            assert_eq!(field.id(), id);
        }

        assert_eq!(shape.depth(), 3);
        assert_eq!(shape.field_tree().map(|f| f.id()).collect::<Vec<_>>(), [0, 1, 2]);
        assert_eq!(shape.children(2).map(|f| f.id()).collect::<Vec<_>>(), [3, 4, 5]);
        assert_eq!(shape.parent(6).map(|f| f.id()), Some(5));
        assert!(shape.parent(0).is_none());
        assert!(shape.parent(99).is_none());
        assert_eq!(shape.children(99).count(), 0);

        let g = shape.field_type(8).unwrap();
        assert_eq!(g.ptr_num(), 2);
        assert_eq!(g.depth(), 3);
        assert_eq!(g.kind(), Kind::Pointer);
        assert_eq!(g.underlying_kind(), Kind::Opaque);
        assert!(g.elem().ty().is::<i32>());
    }

    #[test]
    fn queued_records_expand_in_order() {
        let shape = analyze::<Wide>(&Options::new());

        assert_eq!(
            selectors(&shape),
            ["x", "y", "z", "x.e", "x.f", "x.g", "z.e", "z.f", "z.g"],
        );
    }

    #[test]
    fn repeated_analysis_is_identical() {
        let a = analyze::<P1>(&Options::new());
        let b = analyze::<P1>(&Options::new());

        assert_eq!(a.num_field(), b.num_field());
        for (x, y) in a.fields().iter().zip(b.fields()) {
            assert_eq!(x.id(), y.id());
            assert_eq!(x.selector(), y.selector());
            assert_eq!(x.offset(), y.offset());
            assert_eq!(x.parent_id(), y.parent_id());
        }
    }

    #[test]
    fn cyclic_type_stops_at_max_depth() {
        let shape = analyze::<Node>(&Options::new().with_max_depth(3));

        assert_eq!(
            selectors(&shape),
            ["value", "next", "next.value", "next.next", "next.next.value", "next.next.next"],
        );
        assert_eq!(shape.depth(), 3);
        assert!(shape.children(5).next().is_none());

        assert_eq!(analyze::<Node>(&Options::new()).depth(), 16);
        assert_eq!(analyze::<Node>(&Options::new().with_max_depth(0)).num_field(), 0);
    }

    fn with_policy(name: &'static str, policy: IterPolicy) -> Options {
        Options::new().with_iterator(move |field| match field.name() == name {
            true => policy,
            false => IterPolicy::Take,
        })
    }

    #[test]
    fn skip_offspring_keeps_the_field() {
        let shape = analyze::<P1>(&with_policy("p2", IterPolicy::SkipOffspring));
        assert_eq!(selectors(&shape), ["a", "b", "p2"]);
        assert!(shape.field_type(2).unwrap().children().is_empty());
    }

    #[test]
    fn skip_and_hide_drop_the_field() {
        for policy in [IterPolicy::Skip, IterPolicy::Hide] {
            let shape = analyze::<P1>(&with_policy("b", policy));
            assert_eq!(
                selectors(&shape),
                ["a", "p2", "p2.c", "p2.d", "p2.p3", "p2.p3.e", "p2.p3.f", "p2.p3.g"],
            );

            let shape = analyze::<P1>(&with_policy("p3", policy));
            assert_eq!(selectors(&shape), ["a", "b", "p2", "p2.c", "p2.d"]);
        }
    }

    #[test]
    fn stop_policies_halt_the_level() {
        let shape = analyze::<P1>(&with_policy("b", IterPolicy::TakeAndStop));
        assert_eq!(selectors(&shape), ["a", "b"]);

        let shape = analyze::<P1>(&with_policy("b", IterPolicy::SkipAndStop));
        assert_eq!(selectors(&shape), ["a"]);

        let shape = analyze::<P1>(&with_policy("b", IterPolicy::HideAndStop));
        assert_eq!(selectors(&shape), ["a"]);

        let shape = analyze::<P1>(&with_policy("p2", IterPolicy::TakeAndStop));
        assert_eq!(shape.num_field(), 9);

        let shape = analyze::<P1>(&with_policy("p2", IterPolicy::SkipOffspringAndStop));
        assert_eq!(selectors(&shape), ["a", "b", "p2"]);

        // Nested stops only end their own record.
        let shape = analyze::<P1>(&with_policy("d", IterPolicy::SkipAndStop));
        assert_eq!(selectors(&shape), ["a", "b", "p2", "p2.c"]);
    }

    #[test]
    fn stop_still_expands_queued_siblings() {
        let shape = analyze::<Wide>(&with_policy("y", IterPolicy::SkipAndStop));
        assert_eq!(selectors(&shape), ["x", "x.e", "x.f", "x.g"]);
    }

    #[test]
    fn policy_sees_candidate_descriptor() {
        let options = Options::new().with_iterator(|field| {
            match field.depth() > 1 && field.underlying_kind() == Kind::Opaque {
                true => IterPolicy::Skip,
                false => IterPolicy::Take,
            }
        });
        let shape = analyze::<P1>(&options);

        assert_eq!(selectors(&shape), ["a", "b", "p2", "p2.p3"]);
        assert_eq!(shape.field_type(3).unwrap().id(), 3);
    }

    #[test]
    fn groups_keep_id_order() {
        let options = Options::new().with_group_by(|field| match field.underlying_kind() {
            Kind::Record => Some(String::from("record")),
            Kind::Pointer => None,
            Kind::Opaque => (field.ptr_num() > 0).then(|| String::from("boxed")),
        });
        let shape = analyze::<P1>(&options);

        let ids = |label| shape.group_types(label).iter().map(|f| f.id()).collect::<Vec<_>>();
        assert_eq!(ids("record"), [2, 5]);
        assert_eq!(ids("boxed"), [7, 8]);
        assert!(ids("missing").is_empty());
        assert_eq!(shape.groups().count(), 2);
    }
}
