use super::*;

fn sequence(len: usize) -> Vec<f32> {
    (0..len).map(|x| x as f32).collect()
}

#[test]
fn row_groups_partition() {
    let data = [1, 2, 3, 4, 5, 6];
    let groups = RowGroups::new(&data, 2).unwrap();
    assert_eq!(groups.num_groups(), 3);
    assert_eq!(groups.group(1), &[3, 4]);
    assert_eq!(groups.span(1..3), &[3, 4, 5, 6]);
    assert_eq!(groups.iter().count(), 3);
}

#[test]
fn row_groups_reject_malformed() {
    let data = [1f32; 7];
    assert_eq!(
        RowGroups::new(&data, 2).unwrap_err(),
        ConvertError::NotDivisible { len: 7, width: 2 }
    );
    assert_eq!(RowGroups::new(&data, 0).unwrap_err(), ConvertError::ZeroWidth);
}

#[test]
fn channel_major_transposes() {
    let origin = [1f32, 2., 3., 4., 5., 6.];
    assert_eq!(
        to_channel_major(&origin, 2).unwrap(),
        vec![1., 3., 5., 2., 4., 6.]
    );
}

#[test]
fn group_major_is_identity() {
    let origin = [1f32, 2., 3., 4., 5., 6.];
    assert_eq!(to_group_major(&origin, 2).unwrap(), origin.to_vec());

    for &(len, width) in &[(12, 1), (12, 3), (12, 12), (0, 4)] {
        let a = sequence(len);
        assert_eq!(to_group_major(&a, width).unwrap(), a);
    }
}

#[test]
fn channel_major_twice_recovers_original() {
    for &(num_groups, channel_size) in &[(3, 2), (1, 5), (5, 1), (13, 11), (4, 4)] {
        let a = sequence(num_groups * channel_size);
        let once = to_channel_major(&a, channel_size).unwrap();
        assert_eq!(once.len(), a.len());
        assert_eq!(to_channel_major(&once, num_groups).unwrap(), a);
    }
}

#[test]
fn converters_fail_on_malformed_input() {
    let a = sequence(10);
    assert!(to_channel_major(&a, 3).is_err());
    assert!(to_group_major(&a, 3).is_err());
    assert!(to_channel_major(&a, 0).is_err());
    // The same input fails the same way every time
    assert_eq!(to_channel_major(&a, 4), to_channel_major(&a, 4));
}

#[test]
fn gate_blocks_for_single_unit() {
    let origin = ["a0", "a1", "a2", "a3", "a4", "a5"];
    assert_eq!(
        to_gate_block_layout(&origin, 1).unwrap(),
        vec!["a0", "a2", "a4", "a1", "a3", "a5"]
    );
}

#[test]
fn gate_blocks_ranges() {
    let blocks = GateBlocks::new(3, 3).unwrap();
    assert_eq!(blocks.num_groups(), 14);
    assert_eq!(blocks.num_weights(), 2 * 9 + 2 * 9 + 2 * 3);
    assert_eq!(blocks.source_range(GateBlock::ForwardU), 0..3);
    assert_eq!(blocks.source_range(GateBlock::BackwardU), 3..6);
    assert_eq!(blocks.source_range(GateBlock::ForwardW), 6..9);
    assert_eq!(blocks.source_range(GateBlock::BackwardW), 9..12);
    assert_eq!(blocks.source_range(GateBlock::ForwardBias), 12..13);
    assert_eq!(blocks.source_range(GateBlock::BackwardBias), 13..14);
}

#[test]
fn gate_blocks_move_whole_groups() {
    let n = 2;
    let origin = sequence(GateBlocks::new(n, n).unwrap().num_weights());
    let converted = to_gate_block_layout(&origin, n).unwrap();
    assert_eq!(converted.len(), origin.len());
    // Groups of width 2: U fwd = g0,g1; U bwd = g2,g3; W fwd = g4,g5; W bwd = g6,g7; b = g8,g9
    #[rustfmt::skip]
    let expected = vec![
        0., 1., 2., 3.,     // U fwd
        8., 9., 10., 11.,   // W fwd
        16., 17.,           // bias fwd
        4., 5., 6., 7.,     // U bwd
        12., 13., 14., 15., // W bwd
        18., 19.,           // bias bwd
    ];
    assert_eq!(converted, expected);

    // Every value is moved, none is duplicated
    let mut sorted = converted.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(sorted, origin);
}

#[test]
fn gate_blocks_reject_bad_shapes() {
    assert_eq!(
        GateBlocks::new(3, 2).unwrap_err(),
        ConvertError::MismatchedGateSizes { n_in: 3, n_out: 2 }
    );
    assert_eq!(
        to_gate_block_layout(&sequence(5), 1).unwrap_err(),
        ConvertError::GroupCountMismatch {
            width: 1,
            expected: 6,
            actual: 5
        }
    );
    assert_eq!(
        to_gate_block_layout(&sequence(21), 2).unwrap_err(),
        ConvertError::NotDivisible { len: 21, width: 2 }
    );
    assert!(to_gate_block_layout(&sequence(0), 0).is_err());
}

#[test]
fn split_names_the_six_tensors() {
    let origin = sequence(20);
    let converted = to_gate_block_layout(&origin, 2).unwrap();
    let tensors = split_gate_blocks(&converted, 2).unwrap();
    assert_eq!(tensors.forward.u, vec![0., 1., 2., 3.]);
    assert_eq!(tensors.forward.w, vec![8., 9., 10., 11.]);
    assert_eq!(tensors.forward.bias, vec![16., 17.]);
    assert_eq!(tensors.backward.u, vec![4., 5., 6., 7.]);
    assert_eq!(tensors.backward.w, vec![12., 13., 14., 15.]);
    assert_eq!(tensors.backward.bias, vec![18., 19.]);
    assert!(split_gate_blocks(&converted[1..], 2).is_err());
}
