// Validates the one-time stream header: fixed layout, idempotent cache,
// and agreement between the generator, the cache, and the facade.

#[cfg(test)]
mod tests {
    use logwire_core::constants::{STREAM_HEADER_LEN, WIRE_MAGIC, WIRE_VERSION};
    use logwire_core::layout::{generate_header, stream_header, SerializedLayout};

    #[test]
    fn header_has_fixed_layout() {
        let header = stream_header();
        assert_eq!(header.len(), STREAM_HEADER_LEN);
        assert_eq!(&header[..4], &WIRE_MAGIC);
        assert_eq!(u16::from_le_bytes([header[4], header[5]]), WIRE_VERSION);
    }

    #[test]
    fn header_is_idempotent() {
        let first = stream_header();
        for _ in 0..16 {
            assert_eq!(stream_header(), first);
        }
    }

    #[test]
    fn generator_and_cache_agree() {
        let generated = generate_header().unwrap();
        assert_eq!(generated, stream_header());
    }

    #[test]
    fn facade_returns_cached_header() {
        let layout = SerializedLayout::new();
        assert_eq!(layout.header(), stream_header());
        assert_eq!(layout.header(), layout.header());
    }
}
