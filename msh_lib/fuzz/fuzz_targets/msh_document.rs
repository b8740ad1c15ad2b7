#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: msh_lib::MshDocument| {
    let mut data = data;
    // Most random signatures have no version tag.
    data.signature = msh_lib::version::signature_for_version(data.format_version);
    msh_lib_fuzz::test_write_read_write(&data);
});
