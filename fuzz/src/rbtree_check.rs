#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use ordtree::RedBlackTree;

#[derive(Arbitrary, Debug)]
enum TreeMethod {
    Contains { key: u16 },
    Insert { key: u16 },
    Remove { key: u16 },
    Take { key: u16 },
    Clear,
}

fn model_remove(model: &mut BTreeMap<u16, usize>, key: u16) -> bool {
    match model.get_mut(&key) {
        Some(count) if *count > 1 => {
            *count -= 1;
            true
        }
        Some(_) => {
            model.remove(&key);
            true
        }
        None => false,
    }
}

fuzz_target!(|methods: Vec<TreeMethod>| {
    let mut tree = RedBlackTree::<u16>::new();
    let mut model = BTreeMap::<u16, usize>::new();

    for m in &methods {
        match m {
            TreeMethod::Contains { key } => {
                assert_eq!(tree.contains(key), model.contains_key(key));
            }
            TreeMethod::Insert { key } => {
                assert_eq!(tree.insert(*key), Ok(true));
                *model.entry(*key).or_default() += 1;
            }
            TreeMethod::Remove { key } => {
                let expected = model_remove(&mut model, *key);
                assert_eq!(tree.remove(key), expected, "remove {}", key);
            }
            TreeMethod::Take { key } => {
                let expected = model_remove(&mut model, *key).then_some(*key);
                assert_eq!(tree.take(key), expected, "take {}", key);
            }
            TreeMethod::Clear => {
                tree.clear();
                model.clear();
            }
        }
        if let Err(violation) = tree.validate() {
            panic!("after {:?}: {}", m, violation);
        }
    }

    let expected: Vec<u16> = model
        .iter()
        .flat_map(|(k, n)| std::iter::repeat(*k).take(*n))
        .collect();
    assert_eq!(tree.len(), expected.len());
    assert!(tree.iter().eq(expected.iter()));
});
