#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use ordtree::{RedBlackTree, TreeError};

#[derive(Arbitrary, Debug)]
struct CursorRun {
    keys: Vec<u8>,
    // Bit i set means the i-th element visited is removed.
    removals: Vec<bool>,
}

fuzz_target!(|run: CursorRun| {
    let mut tree = match RedBlackTree::from_elements(run.keys.iter().copied()) {
        Ok(tree) => tree,
        Err(e) => panic!("building from {:?}: {}", run.keys, e),
    };
    let mut sorted = run.keys.clone();
    sorted.sort_unstable();

    let mut kept = Vec::new();
    let mut visited = Vec::new();
    {
        let mut cursor = tree.cursor_mut();
        assert_eq!(cursor.remove_current(), Err(TreeError::NoCurrent));
        let mut i = 0;
        while cursor.has_next() {
            let key = match cursor.advance() {
                Ok(key) => *key,
                Err(e) => panic!("advance: {}", e),
            };
            visited.push(key);
            if run.removals.get(i).copied().unwrap_or(false) {
                assert_eq!(cursor.remove_current(), Ok(key));
                assert_eq!(cursor.remove_current(), Err(TreeError::NoCurrent));
            } else {
                kept.push(key);
            }
            i += 1;
        }
        assert_eq!(cursor.advance(), Err(TreeError::Exhausted));
    }

    assert_eq!(visited, sorted);
    assert!(tree.iter().eq(kept.iter()));
    if let Err(violation) = tree.validate() {
        panic!("{}", violation);
    }
});
