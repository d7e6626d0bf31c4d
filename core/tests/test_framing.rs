// Versioned stream framing: current-format AD binding, version gate, legacy segments.

mod common;

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::common::FakeCrypto;
    use vault_core::config::ReaderConfig;
    use vault_core::constants::{MAX_SEGMENT_CLEARTEXT_LENGTH, SEGMENT_HEADER_SIZE, VERSION};
    use vault_core::crypto::{AeadCrypto, CipherSuite, Crypto};
    use vault_core::headers::{encode_version_header, BackupType, VersionHeader};
    use vault_core::stream::{legacy, StreamCodec, StreamContext, StreamFormat};
    use vault_core::types::BackupError;

    fn aead() -> AeadCrypto {
        AeadCrypto::new(CipherSuite::Aes256Gcm, &[7u8; 32]).unwrap()
    }

    fn kv(name: &str) -> StreamContext {
        StreamContext::package(BackupType::Kv, name).unwrap()
    }

    fn full(name: &str) -> StreamContext {
        StreamContext::package(BackupType::Full, name).unwrap()
    }

    fn write<C: Crypto>(codec: &StreamCodec<C>, ctx: &StreamContext, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        codec.write_versioned_stream(&mut out, ctx, data).unwrap();
        out
    }

    fn write_legacy<C: Crypto>(codec: &StreamCodec<C>, ctx: &StreamContext, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        codec.write_legacy_stream(&mut out, ctx, data).unwrap();
        out
    }

// ## 1️⃣ Current format

    #[test]
    fn current_stream_round_trips() {
        let _ = env_logger::builder().is_test(true).try_init();
        for suite in [CipherSuite::Aes256Gcm, CipherSuite::Chacha20Poly1305] {
            let codec = StreamCodec::new(AeadCrypto::new(suite, &[1u8; 32]).unwrap());
            let ctx = full("org.example.app");
            let wire = write(&codec, &ctx, b"application payload");
            assert_eq!(wire[0], VERSION);

            let decoded = codec.read_versioned_stream(&mut Cursor::new(wire), &ctx).unwrap();
            assert_eq!(decoded.version, VERSION);
            assert_eq!(decoded.cleartext, b"application payload");
        }
    }

    #[test]
    fn empty_cleartext_round_trips() {
        let codec = StreamCodec::new(aead());
        let ctx = kv("a");
        let wire = write(&codec, &ctx, b"");
        let decoded = codec.read_versioned_stream(&mut Cursor::new(wire), &ctx).unwrap();
        assert!(decoded.cleartext.is_empty());
    }

    #[test]
    fn wrong_package_fails_authentication() {
        let codec = StreamCodec::new(aead());
        let wire = write(&codec, &kv("org.a"), b"secret");
        let err = codec.read_versioned_stream(&mut Cursor::new(wire), &kv("org.b")).unwrap_err();
        assert!(matches!(err, BackupError::DecryptionFailed(_)));
    }

    #[test]
    fn kv_stream_cannot_be_read_as_full() {
        let codec = StreamCodec::new(aead());
        let wire = write(&codec, &kv("org.a"), b"secret");
        let err = codec.read_versioned_stream(&mut Cursor::new(wire), &full("org.a")).unwrap_err();
        assert!(matches!(err, BackupError::DecryptionFailed(_)));
    }

    #[test]
    fn metadata_stream_is_bound_to_token() {
        let codec = StreamCodec::new(FakeCrypto::new());
        let wire = write(&codec, &StreamContext::metadata(42), b"{}");
        let err = codec
            .read_versioned_stream(&mut Cursor::new(wire.clone()), &StreamContext::metadata(43))
            .unwrap_err();
        assert!(matches!(err, BackupError::DecryptionFailed(_)));

        let ok = codec
            .read_versioned_stream(&mut Cursor::new(wire), &StreamContext::metadata(42))
            .unwrap();
        assert_eq!(ok.cleartext, b"{}");
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let codec = StreamCodec::new(aead());
        let ctx = full("org.a");
        let mut wire = write(&codec, &ctx, b"payload bytes");
        let last = wire.len() - 1;
        wire[last] ^= 0x01;
        let err = codec.read_versioned_stream(&mut Cursor::new(wire), &ctx).unwrap_err();
        assert!(matches!(err, BackupError::DecryptionFailed(_)));
    }

    #[test]
    fn empty_input_is_malformed() {
        let codec = StreamCodec::new(aead());
        let err = codec.read_versioned_stream(&mut Cursor::new(Vec::new()), &kv("a")).unwrap_err();
        assert!(matches!(err, BackupError::MalformedStream(_)));
    }

    #[test]
    fn version_byte_only_is_malformed() {
        let codec = StreamCodec::new(aead());
        let err = codec
            .read_versioned_stream(&mut Cursor::new(vec![VERSION]), &kv("a"))
            .unwrap_err();
        assert!(matches!(err, BackupError::MalformedStream(_)));
    }

    #[test]
    fn shared_engine_serves_several_codecs() {
        let engine = Arc::new(aead());
        let writer = StreamCodec::new(Arc::clone(&engine));
        let reader = StreamCodec::new(&*engine);
        let ctx = kv("org.shared");
        let wire = write(&writer, &ctx, b"x");
        assert_eq!(reader.read_versioned_stream(&mut Cursor::new(wire), &ctx).unwrap().cleartext, b"x");
    }

// ## 2️⃣ Version gate

    #[test]
    fn format_dispatch() {
        assert_eq!(StreamFormat::from_version(0), StreamFormat::Legacy);
        assert_eq!(StreamFormat::from_version(1), StreamFormat::Current(1));
        assert_eq!(StreamFormat::Current(1).version(), 1);
        assert_eq!(StreamFormat::Legacy.version(), 0);
    }

    #[test]
    fn newer_version_is_rejected_before_decryption() {
        for max in 0..=VERSION {
            let cfg = ReaderConfig { max_version: max, ..ReaderConfig::default() };
            let crypto = FakeCrypto::new();
            let codec = StreamCodec::with_config(&crypto, cfg);
            let mut wire = vec![max + 1];
            wire.extend_from_slice(&[0u8; 64]);

            let err = codec.read_versioned_stream(&mut Cursor::new(wire), &kv("a")).unwrap_err();
            assert!(matches!(err, BackupError::UnsupportedVersion(v) if v == max + 1));
            assert_eq!(crypto.segments_decrypted.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn unknown_version_byte_is_rejected() {
        let codec = StreamCodec::new(aead());
        let err = codec
            .read_versioned_stream(&mut Cursor::new(vec![0xFF, 0, 0]), &kv("a"))
            .unwrap_err();
        assert!(matches!(err, BackupError::UnsupportedVersion(0xFF)));
    }

// ## 3️⃣ Legacy format

    #[test]
    fn legacy_package_stream_round_trips_across_segments() {
        let codec = StreamCodec::new(aead());
        let ctx = full("org.legacy");
        let data: Vec<u8> = (0..MAX_SEGMENT_CLEARTEXT_LENGTH * 2 + 100).map(|i| i as u8).collect();
        let wire = write_legacy(&codec, &ctx, &data);
        assert_eq!(wire[0], 0);

        let decoded = codec.read_versioned_stream(&mut Cursor::new(wire), &ctx).unwrap();
        assert_eq!(decoded.version, 0);
        assert_eq!(decoded.cleartext, data);
    }

    #[test]
    fn legacy_metadata_stream_has_no_version_header() {
        let crypto = FakeCrypto::new();
        let codec = StreamCodec::new(&crypto);
        let ctx = StreamContext::metadata(5);
        let wire = write_legacy(&codec, &ctx, b"{\"a\":1}");
        // one segment: header, body, tag
        assert_eq!(wire.len(), 1 + SEGMENT_HEADER_SIZE + 7 + 16);

        // legacy streams carry no AD, so any token decodes
        let decoded = codec
            .read_versioned_stream(&mut Cursor::new(wire), &StreamContext::metadata(6))
            .unwrap();
        assert_eq!(decoded.cleartext, b"{\"a\":1}");
        assert_eq!(crypto.segments_decrypted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn legacy_header_for_other_package_is_security_violation() {
        let codec = StreamCodec::new(FakeCrypto::new());
        let wire = write_legacy(&codec, &kv("org.a"), b"data");
        let err = codec.read_versioned_stream(&mut Cursor::new(wire), &kv("org.b")).unwrap_err();
        assert!(matches!(err, BackupError::SecurityViolation(_)));
    }

    #[test]
    fn legacy_header_with_wrong_version_is_security_violation() {
        let crypto = FakeCrypto::new();
        let header = VersionHeader::new(1, "org.a", None).unwrap();
        let mut wire = vec![0u8];
        legacy::write_segments(&crypto, &mut wire, &encode_version_header(&header).unwrap()).unwrap();
        legacy::write_segments(&crypto, &mut wire, b"data").unwrap();

        let codec = StreamCodec::new(&crypto);
        let err = codec.read_versioned_stream(&mut Cursor::new(wire), &kv("org.a")).unwrap_err();
        assert!(matches!(err, BackupError::SecurityViolation(_)));
    }

    #[test]
    fn legacy_record_stream_round_trips() {
        let codec = StreamCodec::new(aead());
        let ctx = StreamContext::kv_record("org.a", "record-A").unwrap();
        let wire = write_legacy(&codec, &ctx, b"value-of-A");
        let decoded = codec.read_versioned_stream(&mut Cursor::new(wire), &ctx).unwrap();
        assert_eq!(decoded.cleartext, b"value-of-A");
    }

    #[test]
    fn legacy_header_for_other_record_is_security_violation() {
        let crypto = FakeCrypto::new();
        let header = VersionHeader::new(0, "org.a", Some("record-A")).unwrap();
        let mut wire = vec![0u8];
        legacy::write_segments(&crypto, &mut wire, &encode_version_header(&header).unwrap()).unwrap();
        legacy::write_segments(&crypto, &mut wire, b"value-of-A").unwrap();

        let codec = StreamCodec::new(&crypto);
        for ctx in [StreamContext::kv_record("org.a", "record-B").unwrap(), kv("org.a")] {
            let err = codec
                .read_versioned_stream(&mut Cursor::new(wire.clone()), &ctx)
                .unwrap_err();
            assert!(matches!(err, BackupError::SecurityViolation(_)), "{}", ctx);
        }
    }

    #[test]
    fn package_stream_read_as_record_is_security_violation() {
        let codec = StreamCodec::new(FakeCrypto::new());
        let wire = write_legacy(&codec, &kv("org.a"), b"data");
        let ctx = StreamContext::kv_record("org.a", "record-A").unwrap();
        let err = codec.read_versioned_stream(&mut Cursor::new(wire), &ctx).unwrap_err();
        assert!(matches!(err, BackupError::SecurityViolation(_)));
    }

    #[test]
    fn record_context_limits() {
        assert!(StreamContext::kv_record("org.a", "").is_err());
        assert!(StreamContext::kv_record("org.a", &"k".repeat(256)).is_err());
        assert_eq!(
            StreamContext::kv_record("org.a", "k").unwrap().associated_data(VERSION),
            kv("org.a").associated_data(VERSION)
        );
    }

    #[test]
    fn legacy_package_stream_without_header_is_malformed() {
        let codec = StreamCodec::new(FakeCrypto::new());
        let err = codec.read_versioned_stream(&mut Cursor::new(vec![0u8]), &kv("a")).unwrap_err();
        assert!(matches!(err, BackupError::MalformedStream(_)));
    }

    #[test]
    fn truncated_legacy_segment_is_malformed() {
        let codec = StreamCodec::new(aead());
        let ctx = StreamContext::metadata(1);
        let wire = write_legacy(&codec, &ctx, b"some metadata bytes");

        // cut inside the body and inside the header
        for cut in [wire.len() - 1, 1 + SEGMENT_HEADER_SIZE - 3] {
            let err = codec
                .read_versioned_stream(&mut Cursor::new(wire[..cut].to_vec()), &ctx)
                .unwrap_err();
            assert!(matches!(err, BackupError::MalformedStream(_)), "cut at {}", cut);
        }
    }

    #[test]
    fn tampered_legacy_segment_fails_authentication() {
        let codec = StreamCodec::new(aead());
        let ctx = StreamContext::metadata(1);
        let mut wire = write_legacy(&codec, &ctx, b"some metadata bytes");
        wire[1 + SEGMENT_HEADER_SIZE] ^= 0x80;
        let err = codec.read_versioned_stream(&mut Cursor::new(wire), &ctx).unwrap_err();
        assert!(matches!(err, BackupError::DecryptionFailed(_)));
    }

    #[test]
    fn segment_shorter_than_tag_is_malformed() {
        let crypto = FakeCrypto::new();
        let mut wire = vec![0u8, 0, 15];
        wire.extend_from_slice(&[0u8; 12 + 15]);
        let err = crypto.decrypt_multiple_segments(&mut Cursor::new(wire[1..].to_vec())).unwrap_err();
        assert!(matches!(err, BackupError::MalformedStream(_)));
    }

    #[test]
    fn empty_segment_chain_decodes_to_nothing() {
        let crypto = FakeCrypto::new();
        let out = crypto.decrypt_multiple_segments(&mut Cursor::new(Vec::new())).unwrap();
        assert!(out.is_empty());
    }
}
