use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use type1c::{
    ConvertSettings, ConvertWarning, DefaultWidth, Encoding, Error, ErrorKind, FontFlags,
    Type1Font,
};

const EEXEC_KEY: u16 = 55665;
const CHARSTRING_KEY: u16 = 4330;

/// Encodes a small integer operand.
const fn n(v: i32) -> u8 {
    (v + 139) as u8
}

static SUBRS: Lazy<Vec<Vec<u8>>> = Lazy::new(|| vec![vec![11], vec![11], vec![11], vec![11]]);

static GLYPHS: Lazy<Vec<(&'static str, Vec<u8>)>> = Lazy::new(|| {
    vec![
        // hsbw 0 500, endchar
        (".notdef", vec![n(0), 248, 136, 13, 14]),
        // hsbw 0 250, endchar
        ("space", vec![n(0), 247, 142, 13, 14]),
        // hsbw 20 560, 3 callsubr, rmoveto 0 0, rlineto 260 700,
        // rlineto 260 -700, closepath, endchar
        (
            "A",
            vec![
                n(20),
                248,
                196,
                13,
                n(3),
                10,
                n(0),
                n(0),
                21,
                247,
                152,
                249,
                80,
                5,
                247,
                152,
                253,
                80,
                5,
                9,
                14,
            ],
        ),
        // hsbw 50 600, hstem 0 500, rmoveto 0 0, hlineto 500, vlineto 500,
        // hlineto -500, closepath, endchar
        (
            "H",
            vec![
                n(50),
                248,
                236,
                13,
                n(0),
                248,
                136,
                1,
                n(0),
                n(0),
                21,
                248,
                136,
                6,
                248,
                136,
                7,
                252,
                136,
                6,
                9,
                14,
            ],
        ),
        // hsbw 50 600, endchar
        ("I", vec![n(50), 248, 236, 13, 14]),
        // hsbw 0 500, 1 rlineto
        ("C", vec![n(0), 248, 136, 13, n(1), 5, 14]),
        // hsbw 20 560, seac 5 100 200 65 194
        (
            "Aacute",
            vec![
                n(20),
                248,
                196,
                13,
                n(5),
                n(100),
                247,
                92,
                n(65),
                247,
                86,
                12,
                6,
            ],
        ),
        // hsbw 0 333, rmoveto 100 500, rlineto 100 100, closepath, endchar
        (
            "acute",
            vec![
                n(0),
                247,
                225,
                13,
                n(100),
                248,
                136,
                21,
                n(100),
                n(100),
                5,
                9,
                14,
            ],
        ),
        // hsbw 50 600, seac 0 0 0 73 203
        (
            "Icedilla",
            vec![n(50), 248, 236, 13, n(0), n(0), n(0), n(73), 247, 95, 12, 6],
        ),
    ]
});

static FONT_PFB: Lazy<Vec<u8>> = Lazy::new(|| pfb(&GLYPHS));
static FONT_PFA: Lazy<Vec<u8>> = Lazy::new(|| pfa(&GLYPHS));
static FONT: Lazy<Type1Font> = Lazy::new(|| Type1Font::parse(&FONT_PFB).unwrap());

fn encrypt(plain: &[u8], key: u16) -> Vec<u8> {
    let mut r = u32::from(key);

    plain
        .iter()
        .map(|p| {
            let c = (u32::from(*p) ^ (r >> 8)) & 0xFF;
            r = ((c + r).wrapping_mul(52845) + 22719) & 0xFFFF;
            c as u8
        })
        .collect()
}

fn encrypt_charstring(plain: &[u8]) -> Vec<u8> {
    let mut data = vec![0; 4];
    data.extend_from_slice(plain);

    encrypt(&data, CHARSTRING_KEY)
}

fn cleartext() -> Vec<u8> {
    b"%!PS-AdobeFont-1.0: Test-Regular 001.000\n\
      12 dict begin\n\
      /FontInfo 9 dict dup begin\n\
      /version (001.000) readonly def\n\
      /FullName (Test Regular) readonly def\n\
      /FamilyName (Test) readonly def\n\
      /ItalicAngle 0 def\n\
      /isFixedPitch false def\n\
      end readonly def\n\
      /FontName /Test-Regular def\n\
      /Encoding StandardEncoding def\n\
      /PaintType 0 def\n\
      /FontType 1 def\n\
      /FontMatrix [0.001 0 0 0.001 0 0] readonly def\n\
      /FontBBox {0 -200 600 700} readonly def\n\
      currentfile eexec\n"
        .to_vec()
}

fn private(glyphs: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut out = b"dup /Private 8 dict dup begin\n\
      /RD{string currentfile exch readstring pop}executeonly def\n\
      /ND{noaccess def}executeonly def\n\
      /NP{noaccess put}executeonly def\n\
      /BlueValues [-20 0 450 470] def\n\
      /StdVW [80] def\n\
      /MinFeature{16 16} def\n\
      /password 5839 def\n"
        .to_vec();

    out.extend(format!("/Subrs {} array\n", SUBRS.len()).bytes());
    for (i, subr) in SUBRS.iter().enumerate() {
        let data = encrypt_charstring(subr);
        out.extend(format!("dup {i} {} RD ", data.len()).bytes());
        out.extend(data);
        out.extend(b" NP\n");
    }
    out.extend(b"ND\n");

    out.extend(format!("2 index /CharStrings {} dict dup begin\n", glyphs.len()).bytes());
    for (name, charstring) in glyphs {
        let data = encrypt_charstring(charstring);
        out.extend(format!("/{name} {} RD ", data.len()).bytes());
        out.extend(data);
        out.extend(b" ND\n");
    }
    out.extend(
        b"end\nend\nreadonly put\nnoaccess put\n\
          dup/FontName get exch definefont pop\n\
          mark currentfile closefile\n",
    );

    let mut plain = vec![0; 4];
    plain.extend(out);

    encrypt(&plain, EEXEC_KEY)
}

fn pfb(glyphs: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut out = vec![];

    let mut segment = |kind: u8, data: &[u8]| {
        out.extend([0x80, kind]);
        out.extend((data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
    };

    segment(1, &cleartext());
    segment(2, &private(glyphs));
    segment(1, b"cleartomark\n");

    out.extend([0x80, 3]);
    out
}

fn pfa(glyphs: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut out = cleartext();

    for line in private(glyphs).chunks(32) {
        for b in line {
            out.extend(format!("{b:02x}").bytes());
        }
        out.push(b'\n');
    }

    out.extend(b"cleartomark\n");
    out
}

fn used(codes: &[u8]) -> [bool; 256] {
    let mut used = [false; 256];

    for code in codes {
        used[usize::from(*code)] = true;
    }

    used
}

fn collecting_settings() -> (ConvertSettings, Arc<Mutex<Vec<ConvertWarning>>>) {
    let warnings = Arc::new(Mutex::new(vec![]));
    let sink = warnings.clone();

    let settings = ConvertSettings {
        warning_sink: Arc::new(move |w| sink.lock().unwrap().push(w)),
        ..ConvertSettings::default()
    };

    (settings, warnings)
}

#[test]
fn parse_pfb() {
    let font = &*FONT;

    assert_eq!(font.font_name(), "Test-Regular");
    assert_eq!(font.glyph_count(), GLYPHS.len());
    assert_eq!(font.font_bbox(), Some([0.0, -200.0, 600.0, 700.0]));
    assert_eq!(font.encoding().get(65), Some("A"));
    assert_eq!(font.subroutines().len(), 4);
    assert_eq!(font.charstring("I"), Some(&GLYPHS[4].1[..]));

    let metrics = font.glyph_metrics("A").unwrap().unwrap();
    assert_eq!(metrics.width, 560.0);
    assert_eq!(metrics.bbox.x_min, 20.0);
    assert_eq!(metrics.bbox.x_max, 540.0);
    assert_eq!(metrics.bbox.y_max, 700.0);

    assert!(font.glyph_metrics("B").is_none());
}

#[test]
fn parse_hex_pfa() {
    let font = Type1Font::parse(&FONT_PFA).unwrap();

    assert_eq!(font.font_name(), FONT.font_name());
    assert!(font.glyph_names().eq(FONT.glyph_names()));

    for (name, charstring) in GLYPHS.iter() {
        assert_eq!(font.charstring(name), Some(&charstring[..]));
    }
}

#[test]
fn parse_garbage() {
    assert!(Type1Font::parse(b"").is_err());
    assert!(Type1Font::parse(b"%!PS-AdobeFont-1.0 but nothing else").is_err());
    assert!(Type1Font::parse(&FONT_PFB[..100]).is_err());
}

#[test]
fn convert_basic() {
    let (settings, warnings) = collecting_settings();
    let converted = FONT.convert(&used(b" AH"), None, &settings).unwrap();

    assert!(warnings.lock().unwrap().is_empty());

    assert_eq!(&converted.data[..4], &[1, 0, 4, 4]);
    assert_eq!(converted.font_name, "Test-Regular");
    assert_eq!(&converted.data[9..21], b"Test-Regular");
    assert_eq!(converted.num_glyphs, 4);

    assert_eq!(converted.code_to_gid[usize::from(b' ')], Some(1));
    assert_eq!(converted.code_to_gid[usize::from(b'A')], Some(2));
    assert_eq!(converted.code_to_gid[usize::from(b'H')], Some(3));
    assert_eq!(converted.code_to_gid[usize::from(b'B')], None);

    assert_eq!(converted.first_char, b' ');
    assert_eq!(converted.last_char, b'H');
    assert_eq!(converted.widths.len(), 41);
    assert_eq!(converted.widths[0], 250.0);
    assert_eq!(converted.widths[1], 0.0);
    assert_eq!(converted.widths[33], 560.0);
    assert_eq!(converted.widths[40], 600.0);

    assert_eq!(converted.font_bbox, [0.0, 0.0, 550.0, 700.0]);

    // BlueValues, StdVW and defaultWidthX.
    assert!(
        converted
            .data
            .ends_with(&[119, 159, 248, 86, 159, 6, 219, 11, 247, 142, 20])
    );
}

#[test]
fn font_descriptor() {
    let converted = FONT
        .convert(&used(b"A"), None, &ConvertSettings::default())
        .unwrap();
    let descriptor = converted.descriptor;

    assert_eq!(descriptor.cap_height, 500.0);
    assert_eq!(descriptor.ascent, 700.0);
    assert_eq!(descriptor.descent, -200.0);
    assert_eq!(descriptor.italic_angle, 0.0);
    assert_eq!(descriptor.stem_v, 80.0);
    assert_eq!(descriptor.flags, FontFlags::SERIF | FontFlags::SYMBOLIC);
}

#[test]
fn most_common_default_width() {
    let settings = ConvertSettings {
        default_width: DefaultWidth::MostCommon,
        ..ConvertSettings::default()
    };
    let converted = FONT.convert(&used(b"AHI"), None, &settings).unwrap();

    assert!(converted.data.ends_with(&[219, 11, 248, 236, 20]));
}

#[test]
fn renamed_font() {
    let settings = ConvertSettings {
        font_name: Some("ABCDEF+Test-Regular".to_string()),
        ..ConvertSettings::default()
    };
    let converted = FONT.convert(&used(b"A"), None, &settings).unwrap();

    assert_eq!(converted.font_name, "ABCDEF+Test-Regular");
    assert_eq!(&converted.data[9..28], b"ABCDEF+Test-Regular");
}

#[test]
fn missing_glyph_is_dropped() {
    let (settings, warnings) = collecting_settings();
    let converted = FONT.convert(&used(b"AB"), None, &settings).unwrap();

    assert_eq!(
        *warnings.lock().unwrap(),
        vec![ConvertWarning::MissingGlyph {
            code: b'B',
            name: "B".to_string(),
        }]
    );
    assert!(converted.used[usize::from(b'A')]);
    assert!(!converted.used[usize::from(b'B')]);
    assert_eq!(converted.num_glyphs, 2);
    assert_eq!((converted.first_char, converted.last_char), (b'A', b'A'));
}

#[test]
fn unmapped_codes_are_dropped() {
    let converted = FONT
        .convert(&used(&[0, 1, 2]), None, &ConvertSettings::default())
        .unwrap();

    assert_eq!(converted.num_glyphs, 1);
    assert!(converted.used.iter().all(|u| !u));
    assert_eq!(converted.widths, vec![0.0]);
}

#[test]
fn shared_glyph_becomes_supplement() {
    let mut encoding = Encoding::empty();
    encoding.set(65, "A");
    encoding.set(97, "A");

    let converted = FONT
        .convert(&used(b"Aa"), Some(&encoding), &ConvertSettings::default())
        .unwrap();

    assert_eq!(converted.num_glyphs, 2);
    assert_eq!(converted.code_to_gid[65], Some(1));
    assert_eq!(converted.code_to_gid[97], Some(1));
    assert_eq!(converted.widths.len(), 33);
    assert_eq!(converted.widths[0], 560.0);
    assert_eq!(converted.widths[32], 560.0);
}

#[test]
fn seac_components_are_added() {
    let mut encoding = Encoding::empty();
    encoding.set(200, "Aacute");

    let (settings, warnings) = collecting_settings();
    let converted = FONT
        .convert(&used(&[200]), Some(&encoding), &settings)
        .unwrap();

    assert_eq!(
        *warnings.lock().unwrap(),
        vec![ConvertWarning::Seac("Aacute".to_string())]
    );
    // .notdef, Aacute, acute and A.
    assert_eq!(converted.num_glyphs, 4);
    assert_eq!(converted.code_to_gid[200], Some(1));
    assert_eq!(converted.widths, vec![560.0]);
    assert_eq!(converted.font_bbox, [0.0, -200.0, 600.0, 700.0]);
}

#[test]
fn missing_seac_component() {
    let mut encoding = Encoding::empty();
    encoding.set(1, "Icedilla");

    let (settings, warnings) = collecting_settings();
    let converted = FONT.convert(&used(&[1]), Some(&encoding), &settings).unwrap();

    assert_eq!(
        *warnings.lock().unwrap(),
        vec![
            ConvertWarning::Seac("Icedilla".to_string()),
            ConvertWarning::MissingComponent("cedilla".to_string()),
        ]
    );
    // .notdef, Icedilla and I.
    assert_eq!(converted.num_glyphs, 3);
}

#[test]
fn invalid_glyph() {
    let err = FONT
        .convert(&used(b"AC"), None, &ConvertSettings::default())
        .unwrap_err();

    match err {
        Error::Glyph { name, source } => {
            assert_eq!(name, "C");
            assert_eq!(source.kind, ErrorKind::Stack);
        }
        _ => panic!("unexpected error {err:?}"),
    }
}

#[test]
fn invalid_glyph_is_skipped() {
    let (settings, warnings) = collecting_settings();
    let settings = ConvertSettings {
        skip_invalid_glyphs: true,
        ..settings
    };
    let converted = FONT.convert(&used(b"AC"), None, &settings).unwrap();

    let warnings = warnings.lock().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        ConvertWarning::InvalidGlyph { name, error } if name == "C" && error.kind == ErrorKind::Stack
    ));

    assert_eq!(converted.num_glyphs, 3);
    assert_eq!(converted.widths, vec![560.0, 0.0, 250.0]);
}

#[test]
fn missing_notdef() {
    let font = Type1Font::parse(&pfb(&GLYPHS[1..])).unwrap();

    let err = font
        .convert(&used(b"A"), None, &ConvertSettings::default())
        .unwrap_err();

    assert_eq!(err, Error::MissingNotdef);
}
