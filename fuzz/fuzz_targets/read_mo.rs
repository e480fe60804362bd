#![no_main]

use libfuzzer_sys::fuzz_target;
use po_compiler::MoFile;

fuzz_target!(|data: &[u8]| {
    let _ = MoFile::parse(data);
});
