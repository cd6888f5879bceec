// Example usage of the TRS codec: write a small trace set, then read it back

use tracing::{info, Level};
use trsfile::{Result, Trace, TraceParameterMap, TraceSet, TraceSetParameterMap, TrsMetaData, TrsTag, INPUT};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let path = std::env::temp_dir().join("write_and_read.trs");

    // Header values set here win over the shape inferred from the first trace
    let mut metadata = TrsMetaData::new();
    metadata.put(TrsTag::GlobalTitle, "demo")?;
    let mut set_parameters = TraceSetParameterMap::new();
    set_parameters.put_value("CIPHER", "AES-128")?;
    metadata.put(TrsTag::TraceSetParameters, set_parameters)?;

    let mut writer = TraceSet::create_with(&path, metadata)?;
    for k in 0..16u8 {
        let mut parameters = TraceParameterMap::new();
        parameters.put_value(INPUT, vec![k; 16])?;
        let samples = (0..100).map(|i| ((i * k as i32) % 200 - 100) as f32).collect();
        let mut trace = Trace::with_title(format!("trace {:02}", k), samples, parameters);
        writer.add(&mut trace)?;
    }
    writer.close()?;

    let mut reader = TraceSet::open(&path)?;
    info!(
        "Read back {} traces, sample coding {}",
        reader.number_of_traces(),
        reader.metadata().get_int(TrsTag::SampleCoding)?
    );
    for index in [0, 7, 15] {
        let trace = reader.get(index)?;
        let input: Vec<u8> = trace.parameters().require_value(INPUT)?;
        info!(
            "{}: {} samples, first input byte {}",
            trace.title(),
            trace.number_of_samples(),
            input[0]
        );
    }
    reader.close()?;

    std::fs::remove_file(&path)?;
    Ok(())
}
