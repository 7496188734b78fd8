#![no_main]

use libfuzzer_sys::fuzz_target;
use wire::{read_var_u32, PacketWriter};

fuzz_target!(|data: &[u8]| {
    match read_var_u32(data) {
        Ok((value, consumed)) => {
            assert!(consumed >= 1 && consumed <= 5);
            assert!(consumed <= data.len());

            // Re-encoding must decode back to the same value.
            let mut writer = PacketWriter::new();
            writer.write_var_u32(value);
            let encoded = writer.into_bytes();
            let (decoded, len) = read_var_u32(&encoded).expect("own encoding must decode");
            assert_eq!(decoded, value);
            assert_eq!(len, encoded.len());
        }
        Err(_) => {
            // Truncated or overlong input, fine as long as we got here.
        }
    }
});
