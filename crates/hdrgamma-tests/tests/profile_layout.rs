//! Profile Layout Checks
//!
//! Walks the raw bytes of encoded profiles and checks the header, the tag
//! directory and the MHC2 body against fixed offsets.

use hdrgamma_core::icc::{
    ColorSpace, DateTimeNumber, HEADER_SIZE, ProfileClass, ProfileVersion, TAG_ENTRY_SIZE,
    TAG_TABLE_OFFSET, TagData, TagSignature,
};
use hdrgamma_core::{
    CalibrationMatrix, CorrectionConfig, EncodedProfile, GammaCorrection, ProfileEncoder,
    ProfileMetadata, RedColorantTag, TransferCurve, legacy_curve,
};
use hdrgamma_tests::{DisplayPattern, display_for, init_tracing};
use pretty_assertions::assert_eq;

fn be_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn be_i32(bytes: &[u8], offset: usize) -> i32 {
    be_u32(bytes, offset) as i32
}

fn fixed_metadata() -> ProfileMetadata {
    ProfileMetadata::new("Layout test").with_creation_date(DateTimeNumber::default())
}

fn encode_legacy(tag: RedColorantTag) -> EncodedProfile {
    let curve = legacy_curve(1024).unwrap();
    ProfileEncoder::new(fixed_metadata().with_red_colorant_tag(tag))
        .with_luminance(0.1, 500.0)
        .encode_uniform(&CalibrationMatrix::identity(), &curve)
        .unwrap()
}

#[test]
fn header_fields() {
    init_tracing();
    let profile = encode_legacy(RedColorantTag::Legacy);
    let bytes = profile.as_bytes();

    assert_eq!(be_u32(bytes, 0) as usize, bytes.len());
    assert_eq!(be_u32(bytes, 8), 0x0430_0000);
    assert_eq!(&bytes[12..16], b"mntr");
    assert_eq!(&bytes[16..20], b"RGB ");
    assert_eq!(&bytes[20..24], b"XYZ ");
    assert_eq!(&bytes[36..40], b"acsp");
    assert_eq!(&bytes[40..44], b"MSFT");
    assert_eq!(be_u32(bytes, 64), 0, "perceptual intent");

    // D50 illuminant as s15Fixed16
    assert_eq!(be_i32(bytes, 68), 63190);
    assert_eq!(be_i32(bytes, 72), 65536);
    assert_eq!(be_i32(bytes, 76), 54061);

    let layout = profile.layout().unwrap();
    assert_eq!(layout.header.version, ProfileVersion::V4_3);
    assert_eq!(layout.header.device_class, ProfileClass::Display);
    assert_eq!(layout.header.color_space, ColorSpace::Rgb);
    assert_eq!(layout.header.pcs, ColorSpace::Xyz);
}

#[test]
fn tag_directory_order_and_alignment() {
    let profile = encode_legacy(RedColorantTag::Legacy);
    let bytes = profile.as_bytes();

    let count = be_u32(bytes, HEADER_SIZE) as usize;
    assert_eq!(count, 11);

    let expected: [&[u8; 4]; 11] = [
        b"desc", b"cprt", b"rXYS", b"gXYZ", b"bXYZ", b"wtpt", b"lumi", b"rTRC", b"gTRC", b"bTRC",
        b"MHC2",
    ];
    let data_start = TAG_TABLE_OFFSET + count * TAG_ENTRY_SIZE;
    assert_eq!(data_start, 264);

    let mut next = data_start;
    for (i, sig) in expected.iter().enumerate() {
        let entry = TAG_TABLE_OFFSET + i * TAG_ENTRY_SIZE;
        assert_eq!(&bytes[entry..entry + 4], *sig, "tag {}", i);

        let offset = be_u32(bytes, entry + 4) as usize;
        let length = be_u32(bytes, entry + 8) as usize;
        assert_eq!(offset, next, "{} starts right after the previous body", i);
        assert_eq!(offset % 4, 0);
        assert_eq!(length % 4, 0);
        assert_eq!(&bytes[offset + 4..offset + 8], &[0u8; 4], "reserved bytes");
        next = offset + length;
    }
    assert_eq!(next, bytes.len());
}

#[test]
fn fixed_size_tag_bodies() {
    let profile = encode_legacy(RedColorantTag::Conventional);
    let layout = profile.layout().unwrap();

    for sig in [
        TagSignature::RED_COLORANT,
        TagSignature::GREEN_COLORANT,
        TagSignature::BLUE_COLORANT,
        TagSignature::MEDIA_WHITE,
        TagSignature::LUMINANCE,
    ] {
        let body = layout.tag_bytes(sig).unwrap();
        assert_eq!(body.len(), 20, "{}", sig);
        assert_eq!(&body[0..4], b"XYZ ");
    }

    for sig in [
        TagSignature::RED_TRC,
        TagSignature::GREEN_TRC,
        TagSignature::BLUE_TRC,
    ] {
        let body = layout.tag_bytes(sig).unwrap();
        assert_eq!(body.len(), 16, "{}", sig);
        assert_eq!(&body[0..4], b"curv");
        assert_eq!(be_u32(body, 8), 1);
        assert_eq!(&body[12..14], &563u16.to_be_bytes());
    }

    assert!(layout.find(TagSignature::RED_COLORANT_LEGACY).is_none());
}

#[test]
fn mhc2_body_offsets() {
    let red = legacy_curve(1024).unwrap();
    let green = TransferCurve::identity(1024).unwrap();
    let blue = legacy_curve(1024).unwrap();
    let matrix = CalibrationMatrix::from_row_major(&[
        1.0, 0.0, 0.0, 0.0, //
        0.0, 0.5, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.25,
    ])
    .unwrap();

    let profile = ProfileEncoder::new(fixed_metadata())
        .with_luminance(0.25, 800.0)
        .encode(&matrix, [&red, &green, &blue])
        .unwrap();
    let layout = profile.layout().unwrap();
    let body = layout.tag_bytes(TagSignature::MHC2).unwrap();

    let n = 1024usize;
    let element = 8 + 4 * n;
    assert_eq!(&body[0..4], b"MHC2");
    assert_eq!(be_u32(body, 8) as usize, n);
    assert_eq!(be_i32(body, 12), 16384, "0.25 nits");
    assert_eq!(be_i32(body, 16), 800 * 65536);
    assert_eq!(be_u32(body, 20), 36);
    assert_eq!(be_u32(body, 24) as usize, 84);
    assert_eq!(be_u32(body, 28) as usize, 84 + element);
    assert_eq!(be_u32(body, 32) as usize, 84 + 2 * element);
    assert_eq!(body.len(), 84 + 3 * element);

    // Matrix row-major from offset 36
    assert_eq!(be_i32(body, 36), 65536);
    assert_eq!(be_i32(body, 36 + 5 * 4), 32768);
    assert_eq!(be_i32(body, 36 + 11 * 4), 16384);

    // Each curve element is sf32 with its own preamble
    for channel in 0..3 {
        let start = 84 + channel * element;
        assert_eq!(&body[start..start + 4], b"sf32");
        assert_eq!(&body[start + 4..start + 8], &[0u8; 4]);
    }

    // Green is the identity ramp
    let green_start = 84 + element + 8;
    assert_eq!(be_i32(body, green_start), 0);
    assert_eq!(be_i32(body, green_start + 4 * (n - 1)), 65536);

    match layout.tag(TagSignature::MHC2).unwrap() {
        Some(TagData::Mhc2(mhc2)) => {
            assert_eq!(mhc2.matrix, matrix);
            assert_eq!(mhc2.green.len(), n);
        }
        other => panic!("unexpected MHC2 decode: {:?}", other),
    }
}

#[test]
fn every_fixture_has_consistent_layout() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let installer = hdrgamma_core::DirectoryInstaller::new(dir.path()).unwrap();
    let correction = GammaCorrection::new(installer, CorrectionConfig::default()).unwrap();

    for pattern in DisplayPattern::ALL {
        let display = display_for(pattern);
        let profile = correction.build_profile(&display).unwrap();
        let layout = profile.layout().unwrap();
        layout.check_layout().unwrap();

        let expected_entries = if display.hdr_enabled { 4096 } else { 1024 };
        match layout.tag(TagSignature::MHC2).unwrap() {
            Some(TagData::Mhc2(mhc2)) => {
                assert_eq!(mhc2.red.len(), expected_entries, "{:?}", pattern);
                assert_eq!(mhc2.red, mhc2.green);
                assert_eq!(mhc2.green, mhc2.blue);
                assert_eq!(mhc2.matrix, CalibrationMatrix::identity());
            }
            other => panic!("{:?}: unexpected MHC2 decode: {:?}", pattern, other),
        }
    }
}

#[test]
fn text_tags_are_utf16() {
    let profile = encode_legacy(RedColorantTag::Legacy);
    let layout = profile.layout().unwrap();

    let desc = layout.tag_bytes(TagSignature::PROFILE_DESC).unwrap();
    assert_eq!(&desc[0..4], b"mluc");
    assert_eq!(be_u32(desc, 8), 1);
    assert_eq!(be_u32(desc, 12), 12);
    assert_eq!(&desc[16..20], b"enUS");
    let text_len = be_u32(desc, 20) as usize;
    assert_eq!(text_len, "Layout test".len() * 2);
    assert_eq!(be_u32(desc, 24), 28);

    assert_eq!(
        layout.tag(TagSignature::PROFILE_DESC).unwrap(),
        Some(TagData::Text("Layout test".to_string()))
    );
}
