#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    msh_lib_fuzz::test_read_write(data);
});
