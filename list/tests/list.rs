use assert_matches::assert_matches;
use imut::{Error, List};
use pretty_assertions::assert_eq;

const WIDTH: usize = 64;

fn list<T: Clone>(values: impl IntoIterator<Item = T>) -> List<T> {
    values.into_iter().collect()
}

fn collect<T: Clone>(list: &List<T>) -> Vec<T> {
    list.iter().cloned().collect()
}

#[test]
fn get_item() {
    let list: List<usize> = (0..1000).map(|i| i + 10).collect();
    for i in 0..1000 {
        assert_eq!(list[i], i + 10);
        assert_eq!(list.get(i as isize), Ok(&(i + 10)));
    }
    assert_eq!(list.get(-1), Ok(&1009));
    assert!(list.get(1000).unwrap_err().is_out_of_range());
    assert!(list.get(-1001).unwrap_err().is_out_of_range());
}

#[test]
fn iterate() {
    let data: Vec<usize> = (0..WIDTH + 1).collect();
    let list = List::<_>::from(data.clone());
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), data);
    assert_eq!(list.iter().rev().count(), WIDTH + 1);
    assert_eq!(list.into_iter().collect::<Vec<_>>(), data);
}

#[test]
fn slice() {
    let big: List<usize> = (0..WIDTH.pow(3)).collect();
    let sliced = |start, stop, step| big.slice(start, stop, step).unwrap();

    assert_eq!(sliced(None, Some(100), None), list(0..100));
    assert_eq!(sliced(Some(100), Some(500), None), list(100..500));
    assert_eq!(sliced(Some(500), Some(9000), Some(4)), list((500..9000).step_by(4)));
    assert_eq!(
        sliced(Some(-10), Some(1_000_000), None),
        list(WIDTH.pow(3) - 10..WIDTH.pow(3))
    );
    assert!(sliced(Some(10), Some(5), None).is_empty());
}

#[test]
fn prefix_slices_across_blocks() {
    let data: Vec<u32> = (0..5000).collect();
    let whole = list(data.iter().copied());
    for k in [0, 1, 2, 63, 64, 65, 128, 4095, 4096, 4097, 4999, 5000] {
        let prefix = whole.slice(None, Some(k as isize), None).unwrap();
        prefix.as_trie().check_invariants();
        assert_eq!(collect(&prefix), data[..k].to_vec());
        assert_eq!(prefix, list(data[..k].iter().copied()));
    }
}

#[test]
fn append() {
    let short = list([1, 2]);
    let mut new_list = short.clone();
    for i in 3..WIDTH.pow(2) {
        new_list = new_list.append(i);
    }
    new_list.as_trie().check_invariants();
    assert_eq!(new_list, list(1..WIDTH.pow(2)));
    assert_eq!(short, list([1, 2]));
}

#[test]
fn extend_and_add() {
    let short = list([1, 2]);
    let expected = list(1..WIDTH.pow(2));

    assert_eq!(short.extend(3..WIDTH.pow(2)), expected);
    assert_eq!(&short + &list(3..WIDTH.pow(2)), expected);
    assert_eq!(short.clone() + list(3..WIDTH.pow(2)), expected);
    assert_eq!(short, list([1, 2]));
}

#[test]
fn insert() {
    let single = list([2]);
    let mut new_list = single
        .insert(1, 4)
        .and_then(|l| l.insert(0, 1))
        .and_then(|l| l.insert(2, 3))
        .unwrap();
    for _ in 0..WIDTH.pow(2) {
        let len = new_list.len() as isize;
        new_list = new_list.insert(len, 64000).unwrap();
    }

    let expected: Vec<u32> = [1, 2, 3, 4]
        .into_iter()
        .chain(std::iter::repeat(64000).take(WIDTH.pow(2)))
        .collect();
    assert_eq!(collect(&new_list), expected);
    assert_eq!(single, list([2]));
    assert!(single.insert(3, 1).unwrap_err().is_out_of_range());
}

#[test]
fn remove() {
    let with_dups = list([1, 3, 2, 3]);
    assert_eq!(with_dups.remove(&3), Ok(list([1, 2, 3])));
    assert_eq!(with_dups, list([1, 3, 2, 3]));
    assert_matches!(
        list([1, 2, 3]).remove(&4),
        Err(Error::Vector(imut_vector::Error::NotFound))
    );
}

#[test]
fn index() {
    let big = list(0..WIDTH.pow(2));
    assert_eq!(big.index(&1, None, None), Ok(1));
    assert_eq!(big.index(&2, Some(1), None), Ok(2));
    assert_eq!(big.index(&3, Some(1), Some(999)), Ok(3));
    assert_eq!(big.index(&4000, Some(-200), None), Ok(4000));

    let small = list([1, 2, 3]);
    for (value, start, stop) in [(4, None, None), (1, Some(1), Some(0)), (1, Some(2), Some(10))] {
        assert!(small.index(&value, start, stop).unwrap_err().is_not_found());
    }
}

#[test]
fn count_and_contains() {
    let with_dups = list([1, 2, 3, 2]);
    assert_eq!(with_dups.count(&4), 0);
    assert_eq!(with_dups.count(&1), 1);
    assert_eq!(with_dups.count(&2), 2);
    assert!(with_dups.contains(&3));
    assert!(!with_dups.contains(&5));
}

#[test]
fn scenario() {
    let original = list([1, 2, 3]);
    let appended = original.append(4);
    assert_eq!(collect(&appended), vec![1, 2, 3, 4]);
    let inserted = appended.insert(0, 0).unwrap();
    assert_eq!(collect(&inserted), vec![0, 1, 2, 3, 4]);
    let removed = inserted.remove(&3).unwrap();
    assert_eq!(collect(&removed), vec![0, 1, 2, 4]);
    assert_eq!(original.get(2), Ok(&3));
}

#[test]
fn equality_and_order() {
    let short = list([1, 2]);
    let long = list([1, 2, 3]);
    assert_ne!(short, long);
    assert!(short < long);
    assert!(list([1, 3]) > long);
    assert_eq!(long.slice(None, Some(2), None).unwrap(), short);
}

#[test]
fn display() {
    assert_eq!(list([1, 2, 3]).to_string(), "<1, 2, 3>");
    assert_eq!(List::<i32>::new().to_string(), "<>");
    assert_eq!(format!("{:?}", List::<_>::from(["a"])), r#"["a"]"#);
}

#[test]
fn serde_round_trip() {
    let original: List<u32> = list(0..200);
    let json = serde_json::to_string(&original).unwrap();
    assert!(json.starts_with("[0,1,2,"));
    let back: List<u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, original);
}
