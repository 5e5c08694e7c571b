use d4slice::{AxisSlice, ErrorKind, MultiSlice, Odometer, Slice, SliceSpec};
use quickcheck::{quickcheck, TestResult};

fn s(first: usize, stop: usize, stride: usize, maxsize: usize) -> Slice {
    Slice::new(first, stop, stride, maxsize).unwrap()
}

#[test]
fn count_matches_iteration() {
    let slice = s(1, 10, 2, 10);
    assert_eq!(slice.count(), 5);
    let seen: Vec<usize> = Odometer::factory(&[AxisSlice::from(slice)])
        .unwrap()
        .map(|ix| ix[0])
        .collect();
    assert_eq!(seen, vec![1, 3, 5, 7, 9]);
    assert_eq!(slice.iter().collect::<Vec<_>>(), seen);
}

#[test]
fn compose_subset_of_subset() {
    let outer = s(2, 10, 2, 10);
    let inner = s(1, 3, 1, 4);
    let composed = Slice::compose(&outer, &inner).unwrap();
    assert_eq!(composed.iter().collect::<Vec<_>>(), vec![4, 6]);
    assert_eq!(composed.stride(), 2);
    assert_eq!(composed.maxsize(), 10);
}

#[test]
fn compose_out_of_range() {
    let outer = s(2, 10, 2, 10);
    let inner = s(4, 5, 1, 5);
    let err = Slice::compose(&outer, &inner).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
}

#[test]
fn compose_all_checks_rank() {
    let outer = vec![s(0, 4, 1, 4), s(0, 6, 2, 6)];
    let err = Slice::compose_all(&outer, &[s(0, 2, 1, 4)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RankMismatch);

    let composed = Slice::compose_all(&outer, &[s(1, 3, 1, 4), s(1, 3, 1, 3)]).unwrap();
    assert_eq!(composed[0].iter().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(composed[1].iter().collect::<Vec<_>>(), vec![2, 4]);
}

#[test]
fn finish_twice() {
    let spec = SliceSpec::from(2..9).step_by(3).with_maxsize(12).unwrap();
    let once = spec.finish().unwrap();
    let twice = once.finish().unwrap();
    assert_eq!(
        (once.first(), once.stop(), once.stride(), once.maxsize()),
        (twice.first(), twice.stop(), twice.stride(), twice.maxsize())
    );
    assert_eq!((once.first(), once.stop(), once.stride(), once.maxsize()), (2, 9, 3, 12));
}

#[test]
fn range_conversions() {
    let whole = SliceSpec::from(..).with_maxsize(6).unwrap().finish().unwrap();
    assert!(whole.is_whole());
    assert_eq!(whole, Slice::whole(6));

    let tail = SliceSpec::from(4..).with_maxsize(6).unwrap().finish().unwrap();
    assert_eq!(tail.iter().collect::<Vec<_>>(), vec![4, 5]);

    let head = SliceSpec::from(..3).finish().unwrap();
    assert_eq!((head.first(), head.stop(), head.maxsize()), (0, 3, 3));

    let err = SliceSpec::from(-2..3).finish().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSlice);
}

#[test]
fn unsigned_bounds_beyond_isize() {
    let big = isize::MAX as usize + 1;
    let err = SliceSpec::default().with_maxsize(big).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    let err = SliceSpec::try_from(0..big).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    let err = SliceSpec::try_from(big..).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    let err = SliceSpec::try_from(..usize::MAX).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);

    let spec = SliceSpec::try_from(2usize..5).unwrap();
    assert_eq!(spec.finish().unwrap(), s(2, 5, 1, 5));
}

#[test]
fn constraint_strings() {
    assert_eq!(s(0, 10, 1, 10).to_constraint_string(), "[0:9]");
    assert_eq!(s(1, 10, 3, 10).to_constraint_string(), "[1:3:9]");
    assert_eq!(s(5, 6, 1, 10).to_constraint_string(), "[5]");
    assert_eq!(s(5, 5, 1, 10).to_constraint_string(), "[0]");

    let multi = MultiSlice::new(vec![s(1, 2, 1, 8), s(3, 4, 1, 8), s(5, 8, 2, 8)]).unwrap();
    assert_eq!(multi.to_constraint_string(), "[[1],[3],[5:2:7]]");
    let axes: Vec<AxisSlice> = vec![multi.into(), s(0, 4, 1, 4).into()];
    assert_eq!(d4slice::constraint_string(&axes), "[[1],[3],[5:2:7]][0:3]");
}

#[test]
fn equal_index_sets_compare_equal() {
    use std::collections::HashSet;

    let a = s(0, 10, 3, 10);
    let b = s(0, 10, 3, 20);
    let set: HashSet<Slice> = vec![a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
}

quickcheck! {
    fn count_law(first: u8, len: u8, stride: u8) -> bool {
        let first = first as usize;
        let stop = first + len as usize;
        let stride = stride as usize % 7 + 1;
        let slice = s(first, stop, stride, stop);
        slice.iter().len() == slice.count()
            && slice.iter().eq((first..stop).step_by(stride))
    }

    fn finish_is_idempotent(first: Option<u8>, stop: Option<u8>, stride: Option<u8>, maxsize: Option<u8>) -> TestResult {
        let spec = SliceSpec::new(
            first.map(isize::from),
            stop.map(isize::from),
            stride.map(isize::from),
            maxsize.map(isize::from),
        );
        let once = match spec.finish() {
            Ok(slice) => slice,
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::InvalidSlice);
                return TestResult::discard();
            }
        };
        let twice = once.finish().unwrap();
        TestResult::from_bool(
            (once.first(), once.stop(), once.stride(), once.maxsize())
                == (twice.first(), twice.stop(), twice.stride(), twice.maxsize())
                && once.first() <= once.stop()
                && once.stop() <= once.maxsize() + 1
        )
    }

    fn compose_agrees_with_mapping(ofirst: u8, olen: u8, ostride: u8, ifirst: u8, ilen: u8, istride: u8) -> TestResult {
        let ofirst = ofirst as usize;
        let ostop = ofirst + olen as usize;
        let outer = s(ofirst, ostop, ostride as usize % 5 + 1, ostop + 3);
        let n = outer.count();
        if n == 0 {
            return TestResult::discard();
        }
        let ifirst = ifirst as usize % n;
        let istop = std::cmp::min(ifirst + ilen as usize, n);
        let inner = s(ifirst, istop, istride as usize % 4 + 1, n);

        let composed = Slice::compose(&outer, &inner).unwrap();
        let mapped: Vec<usize> = inner.iter().map(|i| outer.map_index(i).unwrap()).collect();
        TestResult::from_bool(composed.iter().collect::<Vec<_>>() == mapped)
    }
}
