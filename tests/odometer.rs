use d4slice::{
    AxisSlice, ErrorKind, Index, MultiSlice, Odometer, OdometerOptions, PlainOdometer, PowerSet,
    Slice,
};
use itertools::iproduct;

fn s(first: usize, stop: usize, stride: usize, maxsize: usize) -> Slice {
    Slice::new(first, stop, stride, maxsize).unwrap()
}

fn coords(odometer: Odometer) -> Vec<Vec<usize>> {
    odometer.map(|ix| ix.indices().to_vec()).collect()
}

#[test]
fn row_major_grid() {
    let slices = [AxisSlice::from(s(0, 2, 1, 2)), AxisSlice::from(s(0, 3, 1, 3))];
    let odometer = Odometer::factory(&slices).unwrap();
    assert!(matches!(odometer, Odometer::Plain(_)));
    assert_eq!(odometer.total_size(), 6);
    assert!(odometer.is_contiguous());
    assert_eq!(
        coords(odometer),
        vec![
            vec![0, 0],
            vec![0, 1],
            vec![0, 2],
            vec![1, 0],
            vec![1, 1],
            vec![1, 2]
        ]
    );

    let offsets: Vec<usize> = Odometer::factory(&slices)
        .unwrap()
        .offsets()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(offsets, (0..6).collect::<Vec<_>>());
}

#[test]
fn strided_matches_cartesian_product() {
    let a = s(1, 5, 2, 6);
    let b = s(0, 7, 3, 7);
    let c = s(2, 4, 1, 4);
    let slices = [AxisSlice::from(a), b.into(), c.into()];
    let odometer = Odometer::factory(&slices).unwrap();
    assert!(!odometer.is_contiguous());
    assert_eq!(odometer.len(), a.count() * b.count() * c.count());

    let expected: Vec<Vec<usize>> = iproduct!(a.iter(), b.iter(), c.iter())
        .map(|(i, j, k)| vec![i, j, k])
        .collect();
    assert_eq!(coords(odometer), expected);
}

#[test]
fn exhaustion_is_an_error() {
    let mut odometer = Odometer::factory(&[AxisSlice::from(s(0, 2, 1, 2))]).unwrap();
    assert_eq!(odometer.try_next().unwrap().indices(), &[0]);
    assert!(odometer.has_next());
    assert_eq!(odometer.try_next().unwrap().indices(), &[1]);
    assert!(!odometer.has_next());
    let err = odometer.try_next().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchElement);
}

#[test]
fn scalar_yields_one_index() {
    let odometer = Odometer::factory(&[]).unwrap();
    assert_eq!(odometer.rank(), 0);
    assert_eq!(odometer.total_size(), 1);
    let all: Vec<Index> = odometer.collect();
    assert_eq!(all, vec![Index::scalar()]);
}

#[test]
fn zero_count_dimension_yields_nothing() {
    let slices = [AxisSlice::from(s(0, 3, 1, 3)), AxisSlice::from(s(2, 2, 1, 4))];
    let mut odometer = Odometer::factory(&slices).unwrap();
    assert_eq!(odometer.total_size(), 0);
    assert!(!odometer.has_next());
    assert_eq!(odometer.next(), None);
}

#[test]
fn rank_mismatch() {
    let slices = [AxisSlice::from(s(0, 3, 1, 3))];
    let err = Odometer::with_dimensions(&slices, &[3, 4], &OdometerOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RankMismatch);
    let err = PlainOdometer::new(vec![s(0, 3, 1, 3)], vec![]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RankMismatch);
}

#[test]
fn indices_carry_bound_extents() {
    let slices = [AxisSlice::from(s(1, 3, 1, 3)), AxisSlice::from(s(0, 2, 1, 2))];
    let odometer = Odometer::with_dimensions(&slices, &[10, 5], &OdometerOptions::default()).unwrap();
    let offsets: Vec<usize> = odometer.offsets().collect::<Result<_, _>>().unwrap();
    assert_eq!(offsets, vec![5, 6, 10, 11]);
}

#[test]
fn multi_total_is_sum_of_products() {
    let multi = MultiSlice::new(vec![s(0, 1, 1, 5), s(3, 5, 1, 5)]).unwrap();
    let slices = [AxisSlice::from(multi), AxisSlice::from(s(0, 4, 1, 4))];
    let odometer = Odometer::factory(&slices).unwrap();
    assert!(matches!(odometer, Odometer::Multi(_)));
    assert_eq!(odometer.total_size(), 12);

    let seen = coords(odometer);
    assert_eq!(seen.len(), 12);
    let first_block: Vec<Vec<usize>> = iproduct!(0..1, 0..4).map(|(i, j)| vec![i, j]).collect();
    let second_block: Vec<Vec<usize>> = iproduct!(3..5, 0..4).map(|(i, j)| vec![i, j]).collect();
    assert_eq!(seen[..4], first_block[..]);
    assert_eq!(seen[4..], second_block[..]);
}

#[test]
fn multi_order_follows_powerset() {
    let d0 = MultiSlice::new(vec![s(0, 1, 1, 6), s(4, 6, 1, 6)]).unwrap();
    let d1 = MultiSlice::new(vec![s(2, 3, 1, 3), s(0, 2, 1, 3)]).unwrap();
    let slices = [AxisSlice::from(d0.clone()), AxisSlice::from(d1.clone())];
    let options = OdometerOptions::new().trace_powerset(true);
    let odometer = Odometer::factory_with(&slices, &options).unwrap();
    assert_eq!(odometer.total_size(), d0.count() * d1.count());

    let mut expected = Vec::new();
    for row in &PowerSet::new(&[2, 2]).unwrap() {
        let a = d0.sub_slices()[row[0]];
        let b = d1.sub_slices()[row[1]];
        expected.extend(iproduct!(a.iter(), b.iter()).map(|(i, j)| vec![i, j]));
    }
    assert_eq!(coords(odometer), expected);
}

#[test]
fn multi_size_hint_tracks_progress() {
    let multi = MultiSlice::new(vec![s(0, 2, 1, 4), s(3, 4, 1, 4)]).unwrap();
    let mut odometer = Odometer::factory(&[AxisSlice::from(multi)]).unwrap();
    assert_eq!(odometer.len(), 3);
    odometer.next();
    odometer.next();
    assert_eq!(odometer.len(), 1);
    assert_eq!(odometer.next().map(|ix| ix[0]), Some(3));
    assert_eq!(odometer.len(), 0);
    assert_eq!(odometer.try_next().unwrap_err().kind(), ErrorKind::NoSuchElement);
}

#[test]
fn multi_skips_empty_sub_slice() {
    let multi = MultiSlice::new(vec![s(2, 2, 1, 5), s(0, 2, 1, 5)]).unwrap();
    let slices = [AxisSlice::from(multi.clone()), AxisSlice::from(s(0, 2, 1, 2))];
    let odometer = Odometer::factory(&slices).unwrap();
    assert_eq!(odometer.total_size(), 4);
    assert_eq!(
        coords(odometer),
        vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]
    );

    let mut odometer = Odometer::factory(&[AxisSlice::from(multi)]).unwrap();
    assert_eq!(odometer.total_size(), 2);
    assert_eq!(odometer.len(), 2);
    assert_eq!(odometer.next().map(|ix| ix[0]), Some(0));
    assert_eq!(odometer.len(), 1);
    assert_eq!(odometer.next().map(|ix| ix[0]), Some(1));
    assert_eq!(odometer.len(), 0);
    assert!(!odometer.has_next());
    assert_eq!(odometer.try_next().unwrap_err().kind(), ErrorKind::NoSuchElement);
}

#[test]
fn powerset_table() {
    let ps = PowerSet::new(&[2, 1, 3]).unwrap();
    assert_eq!(ps.total(), 6);
    let rows = ps.generate();
    let expected: Vec<Vec<usize>> = iproduct!(0..2, 0..1, 0..3).map(|(a, b, c)| vec![a, b, c]).collect();
    assert_eq!(rows, expected);
    assert_eq!(PowerSet::new(&[3, 0]).unwrap().generate().len(), 0);
    assert_eq!(PowerSet::new(&[]).unwrap().generate(), vec![Vec::<usize>::new()]);
    let err = PowerSet::new(&[usize::MAX, 2]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}
