#![no_main]

use libfuzzer_sys::fuzz_target;
use po_compiler::{encode, parse, MoFile};
use pretty_assertions::assert_eq;

fuzz_target!(|source: &str| {
    let (catalog, stats) = parse(source);
    assert!(catalog.len() <= stats.translated as usize);

    let mo = encode(&catalog).unwrap();
    let expected = catalog
        .iter()
        .map(|(msgid, msgstr)| (msgid.to_vec(), msgstr.to_vec()))
        .collect::<Vec<_>>();
    assert_eq!(MoFile::parse(&mo).unwrap().messages, expected);
});
