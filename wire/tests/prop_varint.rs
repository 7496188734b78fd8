use proptest::prelude::*;
use wire::{read_var_u32, var_u32_len, PacketWriter};

proptest! {
    #[test]
    fn prop_var_u32_roundtrip(value in any::<u32>()) {
        let mut writer = PacketWriter::new();
        writer.write_var_u32(value);
        let bytes = writer.into_bytes();

        prop_assert_eq!(bytes.len(), var_u32_len(value));
        let (read, consumed) = read_var_u32(&bytes).unwrap();
        prop_assert_eq!(read, value);
        prop_assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn prop_var_u32_sequences_concatenate(values in prop::collection::vec(any::<u32>(), 1..32)) {
        let mut writer = PacketWriter::new();
        for &value in &values {
            writer.write_var_u32(value);
        }
        let bytes = writer.into_bytes();

        let mut offset = 0;
        for &expected in &values {
            let (read, consumed) = read_var_u32(&bytes[offset..]).unwrap();
            prop_assert_eq!(read, expected);
            offset += consumed;
        }
        prop_assert_eq!(offset, bytes.len());
    }

    #[test]
    fn prop_read_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        let _ = read_var_u32(&bytes);
    }

    #[test]
    fn prop_angle_wraps_full_turns(degrees in -720.0f32..720.0) {
        let mut a = PacketWriter::new();
        a.write_angle(degrees);
        let mut b = PacketWriter::new();
        b.write_angle(degrees + 360.0);
        // a full turn maps to the same byte unless float scaling lands the
        // two values on different sides of a truncation boundary
        let delta = i16::from(a.as_slice()[0]).wrapping_sub(i16::from(b.as_slice()[0])).unsigned_abs();
        prop_assert!(delta <= 1 || delta >= 255, "delta {delta} for {degrees}");
    }
}
