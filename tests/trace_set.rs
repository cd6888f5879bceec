// End-to-end write and read sessions on real files

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use trsfile::{
    ParameterDefinition, ParameterType, ReaderConfig, SampleCoding, Trace, TraceParameter,
    TraceParameterMap, TraceSet, TraceSetParameter, TraceSetParameterMap, TrsError, TrsMetaData, TrsTag, LEGACY_DATA,
    SAMPLES, TITLE,
};

const NUMBER_OF_TRACES: usize = 1024;
const BYTE_SAMPLES: [f32; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
const SHORT_SAMPLES: [f32; 5] = [1.0, 2.0, 3.0, 4.0, 128.0];
const INT_SAMPLES: [f32; 5] = [1.0, 2.0, 3.0, 4.0, 32768.0];
const FLOAT_SAMPLES: [f32; 5] = [1.0, 2.0, 3.0, 4.0, 5.1];

fn write_uniform(dir: &Path, name: &str, samples: &[f32]) -> PathBuf {
    let path = dir.join(name);
    let mut writable = TraceSet::create(&path).unwrap();
    for _ in 0..NUMBER_OF_TRACES {
        writable.add(&mut Trace::new(samples.to_vec())).unwrap();
    }
    writable.close().unwrap();
    path
}

fn check_uniform(path: &Path, samples: &[f32], coding: SampleCoding) {
    let mut readable = TraceSet::open(path).unwrap();
    assert_eq!(readable.number_of_traces(), NUMBER_OF_TRACES);
    assert_eq!(
        readable.metadata().get_int(TrsTag::SampleCoding).unwrap(),
        i32::from(coding.value())
    );
    for k in 0..NUMBER_OF_TRACES {
        let trace = readable.get(k).unwrap();
        assert_eq!(trace.preferred_coding(), coding);
        for (a, b) in trace.samples().iter().zip(samples) {
            assert!((a - b).abs() < 0.01, "{} != {}", a, b);
        }
    }
}

#[test]
fn test_round_trip_every_coding() {
    let dir = TempDir::new().unwrap();
    let cases = [
        ("bytes.trs", &BYTE_SAMPLES, SampleCoding::Byte),
        ("shorts.trs", &SHORT_SAMPLES, SampleCoding::Short),
        ("ints.trs", &INT_SAMPLES, SampleCoding::Int),
        ("floats.trs", &FLOAT_SAMPLES, SampleCoding::Float),
    ];
    for (name, samples, coding) in cases {
        let path = write_uniform(dir.path(), name, samples);
        check_uniform(&path, samples, coding);
    }
}

#[test]
fn test_random_float_samples_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("random.trs");
    let mut rng = StdRng::seed_from_u64(0x7253);
    let traces: Vec<Vec<f32>> = (0..50)
        .map(|_| (0..256).map(|_| rng.gen_range(-1.0f32..1.0)).collect())
        .collect();

    TraceSet::save(&path, traces.iter().cloned().map(Trace::new)).unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    for (k, expected) in traces.iter().enumerate() {
        assert_eq!(readable.get(k).unwrap().samples(), expected.as_slice());
    }
}

#[test]
fn test_utf8_title() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("title.trs");
    let title = "씨브 크레그스만";
    TraceSet::save(
        &path,
        [Trace::with_title(title, vec![], TraceParameterMap::new())],
    )
    .unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    let trace = readable.get(0).unwrap();
    assert_eq!(trace.title(), title);
    assert_eq!(trace.trace_set_path(), Some(path.as_path()));
}

#[test]
fn test_blank_title_uses_global_title() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.trs");
    TraceSet::save(&path, (0..3).map(|_| Trace::new(vec![1.0]))).unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    assert_eq!(readable.get(2).unwrap().title(), "trace 2");
}

#[test]
fn test_write_trace_set_parameters() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("set_parameters.trs");

    let mut parameters = TraceSetParameterMap::new();
    parameters.put_value("BYTE", 1u8).unwrap();
    parameters.put_value("SHORT", 2i16).unwrap();
    parameters.put_value("INT", 3i32).unwrap();
    parameters.put_value("FLOAT", 4f32).unwrap();
    parameters.put_value("LONG", 5i64).unwrap();
    parameters.put_value("DOUBLE", 6f64).unwrap();
    parameters.put_value("STRING", format!("{:3}", 7)).unwrap();
    parameters.put_value("BOOLEAN", true).unwrap();
    parameters.put_value("BYTEARRAY", vec![8u8, 9, 0]).unwrap();
    parameters.put_value("SHORTARRAY", vec![1i16, 2, 3]).unwrap();
    parameters.put_value("INTARRAY", vec![4i32, 5, 6]).unwrap();
    parameters.put_value("FLOATARRAY", vec![7f32, 8.0, 9.0]).unwrap();
    parameters.put_value("LONGARRAY", vec![0i64, 1, 2]).unwrap();
    parameters.put_value("DOUBLEARRAY", vec![3f64, 4.0, 5.0]).unwrap();
    parameters
        .put_value("BOOLEANARRAY", vec![true, false, true, false, true, true])
        .unwrap();
    parameters
        .put_value(
            "TVLA",
            "Trace set contains the following TVLA sets: Random, R5S-Box_Out\n\
             AES-128 ENCRYPT (Input -> Output) Round 5 S-Box Out:HW(3~7)",
        )
        .unwrap();

    let mut metadata = TrsMetaData::new();
    metadata
        .put(TrsTag::TraceSetParameters, parameters.clone())
        .unwrap();
    TraceSet::create_with(&path, metadata)
        .unwrap()
        .close()
        .unwrap();

    let readable = TraceSet::open(&path).unwrap();
    let read_back = readable.metadata().trace_set_parameters();
    for (name, parameter) in parameters.iter() {
        assert_eq!(read_back.get(name), Some(parameter), "{}", name);
    }
    assert_eq!(read_back.keys().collect::<Vec<_>>(), parameters.keys().collect::<Vec<_>>());
}

#[test]
fn test_varying_string_lengths_are_fitted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("strings.trs");
    let strings = ["abcd", "abcdefgh", "ab", "abcdefgh汉字"];

    let mut written = Vec::new();
    let mut writable = TraceSet::create(&path).unwrap();
    for k in 0..25usize {
        let mut parameters = TraceParameterMap::new();
        parameters.put_value("BYTEARRAY", vec![k as u8; 3]).unwrap();
        parameters.put_value(SAMPLES, vec![k as f32; 3]).unwrap();
        parameters.put_value(TITLE, strings[k % strings.len()]).unwrap();
        let mut trace = Trace::with_title(strings[k % strings.len()], FLOAT_SAMPLES.to_vec(), parameters);
        writable.add(&mut trace).unwrap();
        written.push(trace);
    }
    writable.close().unwrap();

    // the first trace fixed TITLE at 4 bytes
    assert_eq!(
        written[1].parameters().get_value::<String>(TITLE).unwrap().unwrap(),
        "abcd"
    );
    assert_eq!(
        written[2].parameters().get_value::<String>(TITLE).unwrap().unwrap(),
        "ab\0\0"
    );

    let mut readable = TraceSet::open(&path).unwrap();
    let definitions = readable.metadata().trace_parameter_definitions().clone();
    for (k, expected) in written.iter().enumerate() {
        let trace = readable.get(k).unwrap();
        assert_eq!(definitions.len(), expected.parameters().len());
        for name in definitions.keys() {
            assert_eq!(trace.parameters().get(name), expected.parameters().get(name));
        }
        let title: String = trace.parameters().require_value(TITLE).unwrap();
        assert_eq!(title.len(), 4);
        assert!(std::str::from_utf8(title.as_bytes()).is_ok());
        assert!(!title.contains('汉'));
    }
}

#[test]
fn test_read_typed_parameters() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("typed.trs");
    let mut writable = TraceSet::create(&path).unwrap();
    for k in 0..10i32 {
        let mut parameters = TraceParameterMap::new();
        parameters.put_value("BYTE", k as u8).unwrap();
        parameters.put_value("SHORT", k as i16).unwrap();
        parameters.put_value("INT", k).unwrap();
        parameters.put_value("FLOAT", k as f32).unwrap();
        parameters.put_value("LONG", i64::from(k)).unwrap();
        parameters.put_value("DOUBLE", f64::from(k)).unwrap();
        parameters.put_value("BOOL", k % 2 == 0).unwrap();
        parameters.put_value("INTARRAY", vec![k, k + 1]).unwrap();
        writable
            .add(&mut Trace::with_title("", BYTE_SAMPLES.to_vec(), parameters))
            .unwrap();
    }
    writable.close().unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    for k in 0..10i32 {
        let params = readable.get(k as usize).unwrap().parameters().clone();
        assert_eq!(params.require_value::<u8>("BYTE").unwrap(), k as u8);
        assert_eq!(params.require_value::<i16>("SHORT").unwrap(), k as i16);
        assert_eq!(params.require_value::<i32>("INT").unwrap(), k);
        assert_eq!(params.require_value::<f32>("FLOAT").unwrap(), k as f32);
        assert_eq!(params.require_value::<i64>("LONG").unwrap(), i64::from(k));
        assert_eq!(params.require_value::<f64>("DOUBLE").unwrap(), f64::from(k));
        assert_eq!(params.require_value::<bool>("BOOL").unwrap(), k % 2 == 0);
        assert_eq!(params.require_value::<Vec<i32>>("INTARRAY").unwrap(), vec![k, k + 1]);
        // wrong kind and scalar-of-array are both argument errors
        assert!(params.get_value::<i32>("BYTE").unwrap_err().is_argument());
        let err = params.get_value::<i32>("INTARRAY").unwrap_err();
        assert!(err.to_string().contains("array value of length 2"));
    }
}

#[test]
fn test_oversized_parameter_name_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("long_name.trs");
    let name = format!("{}XYZ", " ".repeat(100000 - 3));
    let mut parameters = TraceParameterMap::new();
    parameters.put_value(name, 1i32).unwrap();

    let mut writable = TraceSet::create(&path).unwrap();
    let err = writable
        .add(&mut Trace::with_title("", FLOAT_SAMPLES.to_vec(), parameters))
        .unwrap_err();
    assert!(err.is_format());
    assert_eq!(writable.number_of_traces(), 0);
}

#[test]
fn test_modification_after_read_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("read_only.trs");
    let mut set_parameters = TraceSetParameterMap::new();
    set_parameters.put_value("CIPHER", "AES-128").unwrap();
    set_parameters.put_value("ROUNDS", 10i32).unwrap();
    let mut metadata = TrsMetaData::new();
    metadata
        .put(TrsTag::TraceSetParameters, set_parameters)
        .unwrap();
    let traces = (0..8u8).map(|k| {
        let mut parameters = TraceParameterMap::new();
        parameters.put_value("INPUT", vec![k; 16]).unwrap();
        parameters.put_value("COUNTER", i32::from(k)).unwrap();
        Trace::with_title("", BYTE_SAMPLES.to_vec(), parameters)
    });
    TraceSet::save_with(&path, traces, metadata).unwrap();

    let mut readable = TraceSet::open(&path).unwrap();

    let mut set_params = readable.metadata().trace_set_parameters().clone();
    let before = set_params.clone();
    let mut extra_set = TraceSetParameterMap::new();
    extra_set.put_value("EXTRA", 1i32).unwrap();
    assert!(set_params.put_value("SHOULD_FAIL", 0i32).unwrap_err().is_unsupported());
    assert!(set_params.remove("CIPHER").unwrap_err().is_unsupported());
    assert!(set_params.clear().unwrap_err().is_unsupported());
    assert!(set_params.merge(&extra_set).unwrap_err().is_unsupported());
    assert_eq!(set_params, before);
    assert_eq!(set_params.len(), 2);

    let mut definitions = readable.metadata().trace_parameter_definitions().clone();
    let before = definitions.clone();
    assert!(definitions
        .put("SHOULD_FAIL", ParameterDefinition::new(ParameterType::Byte, 1, 1))
        .unwrap_err()
        .is_unsupported());
    assert!(definitions.remove("INPUT").unwrap_err().is_unsupported());
    assert!(definitions.clear().unwrap_err().is_unsupported());
    assert_eq!(definitions, before);
    assert_eq!(definitions.len(), 2);

    let mut extra = TraceParameterMap::new();
    extra.put_value("EXTRA", 1i32).unwrap();
    for k in 0..8 {
        let mut trace = readable.get(k).unwrap();
        let params = trace.parameters_mut();
        let before = params.clone();
        assert_eq!(before.len(), 2);
        assert!(params.put_value("SHOULD_FAIL", 0i32).unwrap_err().is_unsupported());
        assert!(params.put_value("COUNTER", 99i32).unwrap_err().is_unsupported());
        assert!(params.remove("INPUT").unwrap_err().is_unsupported());
        assert!(params.clear().unwrap_err().is_unsupported());
        assert!(params.merge(&extra).unwrap_err().is_unsupported());
        assert_eq!(*params, before);
        assert_eq!(params.require_value::<Vec<u8>>("INPUT").unwrap(), vec![k as u8; 16]);
        assert_eq!(params.require_value::<i32>("COUNTER").unwrap(), k as i32);
    }
}

#[test]
fn test_read_beyond_trace_set_limit() {
    let dir = TempDir::new().unwrap();
    let path = write_uniform(dir.path(), "bytes.trs", &BYTE_SAMPLES);
    let mut readable = TraceSet::open(&path).unwrap();
    assert!(readable.get(NUMBER_OF_TRACES - 1).is_ok());
    for index in [NUMBER_OF_TRACES, NUMBER_OF_TRACES + 1] {
        let err = readable.get(index).unwrap_err();
        assert!(err.is_argument());
        let msg = err.to_string();
        assert!(msg.contains("Requested trace index"));
        assert!(msg.contains(&format!("({})", index)));
        assert!(msg.contains(&format!("({})", NUMBER_OF_TRACES)));
    }
}

#[test]
fn test_shape_is_locked_by_first_trace() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("locked.trs");
    let mut writable = TraceSet::create(&path).unwrap();
    writable.add(&mut Trace::new(vec![1.0, 2.0, 3.0])).unwrap();

    let err = writable.add(&mut Trace::new(vec![1.0, 2.0])).unwrap_err();
    assert!(err.is_argument());
    assert!(err.to_string().contains("(2) differs from the previous trace(s) (3)"));

    let mut parameters = TraceParameterMap::new();
    parameters.put_value("EXTRA", 1i32).unwrap();
    let err = writable
        .add(&mut Trace::with_title("", vec![1.0, 2.0, 3.0], parameters))
        .unwrap_err();
    assert!(err.is_argument());
    writable.close().unwrap();

    let header = TraceSet::open(&path).unwrap().header_size().unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), header + 3);
    let mut readable = TraceSet::open(&path).unwrap();
    assert_eq!(readable.number_of_traces(), 1);
    assert_eq!(readable.get(0).unwrap().samples(), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_data_length_is_locked_by_first_trace() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data_locked.trs");
    let with_input = |n: usize| {
        let mut parameters = TraceParameterMap::new();
        parameters.put_value("INPUT", vec![0u8; n]).unwrap();
        Trace::with_title("", vec![1.0], parameters)
    };
    let mut writable = TraceSet::create(&path).unwrap();
    writable.add(&mut with_input(16)).unwrap();
    let err = writable.add(&mut with_input(8)).unwrap_err();
    assert!(err.to_string().contains("current trace data length (8) differs from the previous trace(s) (16)"));
}

#[test]
fn test_legacy_trace_without_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy_empty.trs");
    let mut metadata = TrsMetaData::new();
    metadata.put(TrsTag::TrsVersion, 1).unwrap();
    let mut writable = TraceSet::create_with(&path, metadata).unwrap();
    writable.add(&mut Trace::new(vec![])).unwrap();
    writable.close().unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    assert_eq!(readable.metadata().get_int(TrsTag::TrsVersion).unwrap(), 1);
    let trace = readable.get(0).unwrap();
    assert!(trace.parameters().is_empty());
    assert!(trace.samples().is_empty());
}

#[test]
fn test_legacy_data_blob_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.trs");
    let mut metadata = TrsMetaData::new();
    metadata.put(TrsTag::TrsVersion, 1).unwrap();
    let traces = (0..4u8).map(|k| Trace::with_data("", &[k, k + 1, k + 2], vec![f32::from(k)]).unwrap());
    TraceSet::save_with(&path, traces, metadata).unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    assert_eq!(readable.metadata().get_int(TrsTag::DataLength).unwrap(), 3);
    assert!(readable.metadata().trace_parameter_definitions().is_empty());
    let trace = readable.get(2).unwrap();
    assert_eq!(trace.data(), Some(vec![2, 3, 4]));
    assert_eq!(
        trace.parameters().get(LEGACY_DATA),
        Some(&TraceParameter::Byte(vec![2, 3, 4]))
    );
}

#[test]
fn test_small_window_remaps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("window.trs");
    let traces = (0..200).map(|k| Trace::new(vec![k as f32 + 0.5; 32]));
    TraceSet::save(&path, traces).unwrap();

    let header = TraceSet::open(&path).unwrap().header_size().unwrap();
    // room for the header plus a few records of 128 bytes
    let config = ReaderConfig::with_max_window_size(header + 300);
    let mut readable = TraceSet::open_with(&path, &config).unwrap();
    for k in (0..200).rev().chain(0..200).step_by(7) {
        let trace = readable.get(k).unwrap();
        assert_eq!(trace.samples()[0], k as f32 + 0.5);
        assert_eq!(trace.number_of_samples(), 32);
    }
}

#[test]
fn test_truncated_file_is_inconsistent() {
    let dir = TempDir::new().unwrap();
    let path = write_uniform(dir.path(), "bytes.trs", &BYTE_SAMPLES);
    let len = std::fs::metadata(&path).unwrap().len();
    let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 1).unwrap();
    drop(file);

    let mut readable = TraceSet::open(&path).unwrap();
    match readable.get(0).unwrap_err() {
        TrsError::Consistency {
            file_size,
            record_size,
            trace_count,
            ..
        } => {
            assert_eq!(file_size, len - 1);
            assert_eq!(record_size, 5);
            assert_eq!(trace_count, NUMBER_OF_TRACES as u64);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_file_released_after_close() {
    let dir = TempDir::new().unwrap();
    let path = write_uniform(dir.path(), "bytes.trs", &BYTE_SAMPLES);
    {
        let mut readable = TraceSet::open(&path).unwrap();
        readable.metadata().trace_set_parameters();
        readable.get(0).unwrap();
        readable.close().unwrap();
    }
    std::fs::remove_file(&path).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_caller_metadata_wins_over_inferred_shape() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forced.trs");
    let mut metadata = TrsMetaData::new();
    metadata
        .put(TrsTag::SampleCoding, i32::from(SampleCoding::Int.value()))
        .unwrap();
    metadata.put(TrsTag::TitleSpace, 8).unwrap();
    let traces = (0..3).map(|k| {
        Trace::with_title(format!("#{}", k), BYTE_SAMPLES.to_vec(), TraceParameterMap::new())
    });
    TraceSet::save_with(&path, traces, metadata).unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    assert_eq!(readable.metadata().get_int(TrsTag::SampleCoding).unwrap(), 4);
    assert_eq!(readable.metadata().get_int(TrsTag::TitleSpace).unwrap(), 8);
    let trace = readable.get(1).unwrap();
    assert_eq!(trace.title(), "#1");
    assert_eq!(trace.samples(), &BYTE_SAMPLES);
}

#[test]
fn test_illegal_samples_cannot_be_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nan.trs");
    let mut writable = TraceSet::create(&path).unwrap();
    let err = writable.add(&mut Trace::new(vec![1.0, f32::NAN])).unwrap_err();
    assert!(err.is_format());
    assert_eq!(writable.number_of_traces(), 0);
}

#[test]
fn test_oversized_declared_shape_is_inconsistent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge_shape.trs");
    let max = i32::MAX.to_le_bytes();
    let mut header = Vec::new();
    for tag in [0x41u8, 0x42, 0x44, 0x45] {
        header.push(tag);
        header.push(4);
        header.extend_from_slice(&max);
    }
    header.extend_from_slice(&[0x43, 1, 0x14, 0x5F, 0x00]);
    std::fs::write(&path, &header).unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    assert_eq!(readable.number_of_traces(), i32::MAX as usize);
    match readable.get(0).unwrap_err() {
        TrsError::Consistency {
            file_size,
            record_size,
            ..
        } => {
            assert_eq!(file_size, header.len() as u64);
            assert_eq!(record_size, 6 * i32::MAX as u64);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_empty_array_parameter_never_reaches_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty_array.trs");

    let mut parameters = TraceParameterMap::new();
    assert!(parameters
        .put("X", TraceParameter::Int(vec![]))
        .unwrap_err()
        .is_argument());
    assert!(parameters.is_empty());

    // collecting skips the checks in put, so the writer has to refuse it
    let parameters: TraceParameterMap = [("X".to_string(), TraceParameter::Int(vec![]))]
        .into_iter()
        .collect();
    let mut writable = TraceSet::create(&path).unwrap();
    let err = writable
        .add(&mut Trace::with_title("", BYTE_SAMPLES.to_vec(), parameters))
        .unwrap_err();
    assert!(err.is_argument());
    assert_eq!(writable.number_of_traces(), 0);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    writable.add(&mut Trace::new(BYTE_SAMPLES.to_vec())).unwrap();
    writable.close().unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    assert_eq!(readable.number_of_traces(), 1);
    assert!(readable.get(0).unwrap().parameters().is_empty());
}

#[test]
fn test_empty_array_trace_set_parameter_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty_set_array.trs");
    let set_parameters: TraceSetParameterMap =
        [("X".to_string(), TraceSetParameter(TraceParameter::Byte(vec![])))]
            .into_iter()
            .collect();
    let mut metadata = TrsMetaData::new();
    metadata
        .put(TrsTag::TraceSetParameters, set_parameters)
        .unwrap();

    let mut writable = TraceSet::create_with(&path, metadata).unwrap();
    let err = writable
        .add(&mut Trace::new(BYTE_SAMPLES.to_vec()))
        .unwrap_err();
    assert!(err.is_argument());
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_caller_data_length_follows_definitions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data_length.trs");
    let mut metadata = TrsMetaData::new();
    metadata.put(TrsTag::DataLength, 99).unwrap();
    let traces = (0..3u8).map(|k| {
        let mut parameters = TraceParameterMap::new();
        parameters.put_value("INPUT", vec![k; 16]).unwrap();
        Trace::with_title("", BYTE_SAMPLES.to_vec(), parameters)
    });
    TraceSet::save_with(&path, traces, metadata).unwrap();

    let mut readable = TraceSet::open(&path).unwrap();
    assert_eq!(readable.metadata().get_int(TrsTag::DataLength).unwrap(), 16);
    let header = readable.header_size().unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), header + 3 * (16 + 5));
    assert_eq!(
        readable.get(2).unwrap().parameters().require_value::<Vec<u8>>("INPUT").unwrap(),
        vec![2u8; 16]
    );
}
