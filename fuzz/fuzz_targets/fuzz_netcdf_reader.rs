#![no_main]

use libfuzzer_sys::fuzz_target;

use dsgconvert::ncfile::NcReader;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either parse or fail with an error, never panic
    let Ok(reader) = NcReader::from_bytes(data.to_vec()) else {
        return;
    };

    let names: Vec<String> = reader
        .header()
        .variables
        .iter()
        .map(|v| v.name.clone())
        .collect();
    for name in names.iter().take(64) {
        let _ = reader.read_variable(name);
    }

    let _ = dsgconvert::validator::validate_dsg_bytes("fuzz", data.to_vec());
});
