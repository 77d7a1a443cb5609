#![no_main]

use arbitrary::Arbitrary;
use lazy_segtree::{LazySegmentTree, ops::Add};
use libfuzzer_sys::fuzz_target;
use std::num::Wrapping;

#[derive(Debug, Arbitrary)]
enum Op {
    RangeUpdate(i16, i16, i32),
    PointUpdate(i16, i32),
    RangeQuery(i16, i16),
}

#[derive(Debug, Arbitrary)]
struct Input {
    values: Vec<i32>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut values: Vec<Wrapping<i32>> = input.values.into_iter().map(Wrapping).collect();
    let Ok(mut tree) = LazySegmentTree::build(&values, Add) else {
        assert!(values.is_empty());
        return;
    };
    let n = values.len() as isize;

    for op in input.ops {
        match op {
            Op::RangeUpdate(l, r, delta) => {
                let (l, r) = (l as isize, r as isize);
                tree.range_update(l, r, Wrapping(delta));
                for i in l.max(0)..=r.min(n - 1) {
                    values[i as usize] += Wrapping(delta);
                }
            }
            Op::PointUpdate(i, value) => {
                let i = i as isize;
                let ok = tree.point_update(i, Wrapping(value)).is_ok();
                assert_eq!(ok, (0..n).contains(&i));
                if ok {
                    values[i as usize] = Wrapping(value);
                }
            }
            Op::RangeQuery(l, r) => {
                let (l, r) = (l as isize, r as isize);
                let expected: Wrapping<i32> = (l.max(0)..=r.min(n - 1))
                    .map(|i| values[i as usize])
                    .sum();
                assert_eq!(tree.range_query(l, r), expected);
            }
        }
    }
    assert_eq!(tree.propagate(), values);
});
