use super::*;
use crate::error::ValidationError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TINY_PARAMS: HyperParams = HyperParams {
    freq_bins: 2,
    conv_kernel_w: 1,
    conv_stride: 1,
    conv_pad: 0,
    hidden_size: 2,
    rnn_depth: 1,
    num_output_classes: 2,
    clamp_max: 20f32,
};

// Spectrogram of 2 bins x 2 frames, bin-major
const INPUT: [f32; 4] = [1., 2., 3., 4.];
const REFERENCE: [f32; 4] = [23., -7., 31., -9.];

lazy_static! {
    static ref TINY_WEIGHTS: TempDir = write_tiny_weights();
}

/// Writes weights in the exporter's layout:
/// conv filters [1, 2] and [3, 4], forward recurrence passes its input
/// through, backward recurrence only adds a bias of [1, 0], fc1 is the
/// identity and fc2 computes (h0 + h1, h0 - h1).
fn write_tiny_weights() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, contents: &str| fs::write(dir.path().join(name), contents).unwrap();
    write(CONV_WEIGHTS_FILE, "1,3\n2,4\n");
    write(
        &birnn_weights_file(0),
        "1,0\n0,1\n0,0\n0,0\n0,0\n0,0\n0,0\n0,0\n0,0\n1,0\n",
    );
    write(FC1_WEIGHTS_FILE, "1,0\n0,1\n");
    write(FC2_WEIGHTS_FILE, "1,1\n1,-1\n");
    dir
}

fn tiny_network(dir: &Path) -> Result<SpeechNetwork> {
    SpeechNetwork::new(TINY_PARAMS, Weights::load(dir, &TINY_PARAMS)?)
}

#[test]
fn weights_are_converted_on_load() {
    let weights = Weights::load(TINY_WEIGHTS.path(), &TINY_PARAMS).unwrap();
    assert_eq!(weights.conv, vec![1., 2., 3., 4.]);
    assert_eq!(weights.birnn.len(), 1);
    #[rustfmt::skip]
    let expected_birnn = vec![
        1., 0., 0., 1., // U fwd
        0., 0., 0., 0., // W fwd
        0., 0.,         // bias fwd
        0., 0., 0., 0., // U bwd
        0., 0., 0., 0., // W bwd
        1., 0.,         // bias bwd
    ];
    assert_eq!(weights.birnn[0], expected_birnn);
    assert_eq!(weights.fc2, vec![1., 1., 1., -1.]);
}

#[test]
fn tiny_network_predicts_reference() {
    let network = tiny_network(TINY_WEIGHTS.path()).unwrap();
    assert_eq!(network.predict(&INPUT).unwrap(), REFERENCE.to_vec());
    assert_eq!(evaluate(&network, &INPUT, &REFERENCE).unwrap(), 0f32);
}

#[test]
fn evaluation_fails_on_first_deviation() {
    let network = tiny_network(TINY_WEIGHTS.path()).unwrap();
    let reference = [23.5f32, -7., 40., 0.];
    match evaluate(&network, &INPUT, &reference) {
        Err(Error::Validation(ValidationError::OutOfTolerance {
            index,
            observed,
            expected,
        })) => {
            assert_eq!(index, 2);
            assert_eq!(observed, 31.);
            assert_eq!(expected, 40.);
        }
        other => panic!("expected a validation failure, got {:?}", other),
    }
}

#[test]
fn predict_rejects_partial_frames() {
    let network = tiny_network(TINY_WEIGHTS.path()).unwrap();
    assert!(matches!(network.predict(&INPUT[..3]), Err(Error::Dimension(_))));
    assert!(matches!(network.predict(&[]), Err(Error::Dimension(_))));
}

#[test]
fn missing_recurrent_layer_file_fails_load() {
    let params = HyperParams {
        rnn_depth: 2,
        ..TINY_PARAMS
    };
    assert!(matches!(
        Weights::load(TINY_WEIGHTS.path(), &params),
        Err(Error::Io { .. })
    ));
}

#[test]
fn network_rejects_wrong_depth() {
    let mut weights = Weights::load(TINY_WEIGHTS.path(), &TINY_PARAMS).unwrap();
    weights.birnn.push(weights.birnn[0].clone());
    assert!(matches!(
        SpeechNetwork::new(TINY_PARAMS, weights),
        Err(Error::Dimension(_))
    ));
}

#[test]
fn dimensions_must_chain() {
    let a = DenseLayer::new(2, 3, vec![0.; 6]).unwrap();
    let b = DenseLayer::new(3, 1, vec![0.; 3]).unwrap();
    assert!(verify_network_dimensions(&[&a as &dyn Layer, &b]).is_ok());
    assert!(verify_network_dimensions(&[&b as &dyn Layer, &a]).is_err());
}

#[test]
fn default_params_match_exported_shapes() {
    let params = HyperParams::default();
    assert_eq!(params.conv_shape().as_tuple(), (1, 1152, 1, 13, 11));
    assert_eq!(
        params.birnn_num_weights(),
        2 * 1152 * 1152 + 2 * 1152 * 1152 + 2 * 1152
    );
}

