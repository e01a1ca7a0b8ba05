use dynarr::{DynArr, DynArrError};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    PushBack(i32),
    PushFront(i32),
    Insert(usize, i32),
    Erase(usize),
    PopBack,
    PopFront,
    Remove(i32),
    RemoveAll(i32),
    Resize(usize),
}

fn op() -> impl Strategy<Value = Op> {
    // Small values so that `remove` and `remove_all` find matches.
    let value = 0..4i32;
    prop_oneof![
        value.clone().prop_map(Op::PushBack),
        value.clone().prop_map(Op::PushFront),
        (0usize..48, value.clone()).prop_map(|(i, v)| Op::Insert(i, v)),
        (0usize..48).prop_map(Op::Erase),
        Just(Op::PopBack),
        Just(Op::PopFront),
        value.clone().prop_map(Op::Remove),
        value.prop_map(Op::RemoveAll),
        (0usize..64).prop_map(Op::Resize),
    ]
}

/// Capacity after one size change to `new_len` under the resize policy.
fn policy_step(cap: usize, new_len: usize) -> usize {
    if new_len > cap || new_len < cap / 3 {
        2 * new_len
    } else {
        cap
    }
}

/// Apply `op` to both the array and a `Vec` model, checking that they agree on the outcome.
///
/// `cap` tracks the capacity the resize policy predicts, one step per single-element change.
fn apply(
    arr: &mut DynArr<i32>,
    model: &mut Vec<i32>,
    cap: &mut usize,
    op: &Op,
) -> Result<(), TestCaseError> {
    let out_of_range = |index: usize, len: usize| DynArrError::IndexOutOfRange { index, len };
    let len = model.len();
    match *op {
        Op::PushBack(v) => {
            arr.push_back(v).unwrap();
            model.push(v);
        }
        Op::PushFront(v) => {
            arr.push_front(v).unwrap();
            model.insert(0, v);
        }
        Op::Insert(i, v) => {
            if i <= len {
                arr.insert(i, v).unwrap();
                model.insert(i, v);
            } else {
                prop_assert_eq!(arr.insert(i, v), Err(out_of_range(i, len)));
            }
        }
        Op::Erase(i) => {
            if i < len {
                prop_assert_eq!(arr.erase(i), Ok(model.remove(i)));
            } else {
                prop_assert_eq!(arr.erase(i), Err(out_of_range(i, len)));
            }
        }
        Op::PopBack => match model.pop() {
            Some(v) => prop_assert_eq!(arr.pop_back(), Ok(v)),
            None => prop_assert_eq!(arr.pop_back(), Err(out_of_range(0, 0))),
        },
        Op::PopFront => {
            if len > 0 {
                prop_assert_eq!(arr.pop_front(), Ok(model.remove(0)));
            } else {
                prop_assert_eq!(arr.pop_front(), Err(out_of_range(0, 0)));
            }
        }
        Op::Remove(v) => {
            let found = match model.iter().position(|&x| x == v) {
                Some(i) => {
                    model.remove(i);
                    true
                }
                None => false,
            };
            prop_assert_eq!(arr.remove(&v), Ok(found));
        }
        Op::RemoveAll(v) => {
            model.retain(|&x| x != v);
            prop_assert_eq!(arr.remove_all(&v), Ok(len - model.len()));
            for step in (model.len()..len).rev() {
                *cap = policy_step(*cap, step);
            }
            return Ok(());
        }
        Op::Resize(n) => {
            arr.resize(n).unwrap();
            model.resize(n, 0);
        }
    }
    if model.len() != len || matches!(op, Op::Resize(_)) {
        *cap = policy_step(*cap, model.len());
    }
    Ok(())
}

proptest! {
    /// Random operation sequences agree with `Vec` on contents and with the resize policy on capacity.
    #[test]
    fn matches_vec_model(ops in prop::collection::vec(op(), 0..200)) {
        let mut arr = DynArr::new();
        let mut model = Vec::new();
        let mut cap = 0;
        for op in &ops {
            apply(&mut arr, &mut model, &mut cap, op)?;
            prop_assert_eq!(arr.as_slice(), model.as_slice());
            prop_assert_eq!(arr.capacity(), cap, "after {:?}", op);
            prop_assert!(arr.len() <= arr.capacity());
        }
    }

    /// Sized construction makes every index readable.
    #[test]
    fn with_len_readable(n in 0usize..512) {
        let arr: DynArr<u16> = DynArr::with_len(n).unwrap();
        prop_assert_eq!(arr.len(), n);
        prop_assert_eq!(arr.capacity(), 2 * n);
        for i in 0..n {
            prop_assert_eq!(arr.get(i), Ok(&0));
        }
        prop_assert!(arr.get(n).is_err());
    }

    /// Erasing what was just inserted restores the original.
    #[test]
    fn insert_erase_round_trip(values in prop::collection::vec(any::<i32>(), 0..64), i in any::<prop::sample::Index>(), v in any::<i32>()) {
        let a: DynArr<i32> = values.into_iter().collect();
        let index = i.index(a.len() + 1);
        let mut b = a.clone();
        b.insert(index, v).unwrap();
        prop_assert_eq!(b.erase(index), Ok(v));
        prop_assert_eq!(b, a);
    }

    /// Copies compare equal and are independent of their source.
    #[test]
    fn copy_is_independent(values in prop::collection::vec(any::<i32>(), 1..64), v in any::<i32>()) {
        let a: DynArr<i32> = values.iter().copied().collect();
        let mut b = a.clone();
        prop_assert_eq!(&b, &a);
        prop_assert_eq!(b.capacity(), a.capacity());

        b.set(0, v.wrapping_add(1)).unwrap();
        b.push_back(v).unwrap();
        prop_assert_eq!(a.as_slice(), values.as_slice());
    }

    /// N pushes onto an empty array reallocate O(log N) times.
    #[test]
    fn push_back_reallocates_logarithmically(n in 1usize..4096) {
        let mut arr = DynArr::new();
        let mut reallocations = 0u32;
        for i in 0..n {
            let block = (arr.capacity(), arr.as_ptr());
            arr.push_back(i).unwrap();
            if (arr.capacity(), arr.as_ptr()) != block {
                reallocations += 1;
            }
        }
        prop_assert!(reallocations <= usize::BITS - n.leading_zeros());
    }

    /// Alternating push and pop from `capacity = 2L` never reallocates.
    #[test]
    fn push_pop_hysteresis(l in 1usize..256, rounds in 1usize..32) {
        let mut arr: DynArr<u8> = DynArr::with_len(l).unwrap();
        let block = (arr.capacity(), arr.as_ptr());
        for _ in 0..rounds {
            arr.push_back(1).unwrap();
            prop_assert_eq!((arr.capacity(), arr.as_ptr()), block);
            arr.pop_back().unwrap();
            prop_assert_eq!((arr.capacity(), arr.as_ptr()), block);
        }
    }

    /// Concatenation leaves both operands untouched.
    #[test]
    fn concat_matches_chain(a in prop::collection::vec(any::<i8>(), 0..32), b in prop::collection::vec(any::<i8>(), 0..32)) {
        let x: DynArr<i8> = a.iter().copied().collect();
        let y: DynArr<i8> = b.iter().copied().collect();
        let joined = &x + &y;
        let expected: Vec<i8> = a.iter().chain(b.iter()).copied().collect();
        prop_assert_eq!(joined.as_slice(), expected.as_slice());
        prop_assert_eq!(x.as_slice(), a.as_slice());
        prop_assert_eq!(y.as_slice(), b.as_slice());

        let mut z = x.clone();
        z += &y;
        prop_assert_eq!(z, joined);
    }

    /// Sub-arrays copy the clamped range and reject the end position.
    #[test]
    fn subarray_clamps(values in prop::collection::vec(any::<i32>(), 0..32), index in 0usize..40, len in prop::option::of(0usize..40)) {
        let arr: DynArr<i32> = values.iter().copied().collect();
        match arr.subarray(index, len) {
            Ok(sub) => {
                prop_assert!(index < values.len());
                let end = len.map_or(values.len(), |n| (index + n).min(values.len()));
                prop_assert_eq!(sub.as_slice(), &values[index..end]);
            }
            Err(e) => {
                prop_assert!(index >= values.len());
                prop_assert_eq!(e, DynArrError::IndexOutOfRange { index, len: values.len() });
            }
        }
    }
}

#[test]
fn remove_all_example() {
    let mut arr = dynarr::dynarr![1, 2, 1, 3, 1];
    assert_eq!(arr.remove_all(&1), Ok(3));
    assert_eq!(arr, [2, 3]);
}
