//! The predefined strings of the CFF format.

use phf::phf_map;

/// Number of predefined strings. Custom strings start at this SID.
pub(crate) const STANDARD_STRINGS_LEN: u16 = 391;

/// Returns the SID of `name` if it is a predefined string.
pub(crate) fn standard_sid(name: &str) -> Option<u16> {
    STANDARD_STRINGS.get(name).copied()
}

static STANDARD_STRINGS: phf::Map<&'static str, u16> = phf_map! {
    ".notdef" => 0u16,
    "space" => 1u16,
    "exclam" => 2u16,
    "quotedbl" => 3u16,
    "numbersign" => 4u16,
    "dollar" => 5u16,
    "percent" => 6u16,
    "ampersand" => 7u16,
    "quoteright" => 8u16,
    "parenleft" => 9u16,
    "parenright" => 10u16,
    "asterisk" => 11u16,
    "plus" => 12u16,
    "comma" => 13u16,
    "hyphen" => 14u16,
    "period" => 15u16,
    "slash" => 16u16,
    "zero" => 17u16,
    "one" => 18u16,
    "two" => 19u16,
    "three" => 20u16,
    "four" => 21u16,
    "five" => 22u16,
    "six" => 23u16,
    "seven" => 24u16,
    "eight" => 25u16,
    "nine" => 26u16,
    "colon" => 27u16,
    "semicolon" => 28u16,
    "less" => 29u16,
    "equal" => 30u16,
    "greater" => 31u16,
    "question" => 32u16,
    "at" => 33u16,
    "A" => 34u16,
    "B" => 35u16,
    "C" => 36u16,
    "D" => 37u16,
    "E" => 38u16,
    "F" => 39u16,
    "G" => 40u16,
    "H" => 41u16,
    "I" => 42u16,
    "J" => 43u16,
    "K" => 44u16,
    "L" => 45u16,
    "M" => 46u16,
    "N" => 47u16,
    "O" => 48u16,
    "P" => 49u16,
    "Q" => 50u16,
    "R" => 51u16,
    "S" => 52u16,
    "T" => 53u16,
    "U" => 54u16,
    "V" => 55u16,
    "W" => 56u16,
    "X" => 57u16,
    "Y" => 58u16,
    "Z" => 59u16,
    "bracketleft" => 60u16,
    "backslash" => 61u16,
    "bracketright" => 62u16,
    "asciicircum" => 63u16,
    "underscore" => 64u16,
    "quoteleft" => 65u16,
    "a" => 66u16,
    "b" => 67u16,
    "c" => 68u16,
    "d" => 69u16,
    "e" => 70u16,
    "f" => 71u16,
    "g" => 72u16,
    "h" => 73u16,
    "i" => 74u16,
    "j" => 75u16,
    "k" => 76u16,
    "l" => 77u16,
    "m" => 78u16,
    "n" => 79u16,
    "o" => 80u16,
    "p" => 81u16,
    "q" => 82u16,
    "r" => 83u16,
    "s" => 84u16,
    "t" => 85u16,
    "u" => 86u16,
    "v" => 87u16,
    "w" => 88u16,
    "x" => 89u16,
    "y" => 90u16,
    "z" => 91u16,
    "braceleft" => 92u16,
    "bar" => 93u16,
    "braceright" => 94u16,
    "asciitilde" => 95u16,
    "exclamdown" => 96u16,
    "cent" => 97u16,
    "sterling" => 98u16,
    "fraction" => 99u16,
    "yen" => 100u16,
    "florin" => 101u16,
    "section" => 102u16,
    "currency" => 103u16,
    "quotesingle" => 104u16,
    "quotedblleft" => 105u16,
    "guillemotleft" => 106u16,
    "guilsinglleft" => 107u16,
    "guilsinglright" => 108u16,
    "fi" => 109u16,
    "fl" => 110u16,
    "endash" => 111u16,
    "dagger" => 112u16,
    "daggerdbl" => 113u16,
    "periodcentered" => 114u16,
    "paragraph" => 115u16,
    "bullet" => 116u16,
    "quotesinglbase" => 117u16,
    "quotedblbase" => 118u16,
    "quotedblright" => 119u16,
    "guillemotright" => 120u16,
    "ellipsis" => 121u16,
    "perthousand" => 122u16,
    "questiondown" => 123u16,
    "grave" => 124u16,
    "acute" => 125u16,
    "circumflex" => 126u16,
    "tilde" => 127u16,
    "macron" => 128u16,
    "breve" => 129u16,
    "dotaccent" => 130u16,
    "dieresis" => 131u16,
    "ring" => 132u16,
    "cedilla" => 133u16,
    "hungarumlaut" => 134u16,
    "ogonek" => 135u16,
    "caron" => 136u16,
    "emdash" => 137u16,
    "AE" => 138u16,
    "ordfeminine" => 139u16,
    "Lslash" => 140u16,
    "Oslash" => 141u16,
    "OE" => 142u16,
    "ordmasculine" => 143u16,
    "ae" => 144u16,
    "dotlessi" => 145u16,
    "lslash" => 146u16,
    "oslash" => 147u16,
    "oe" => 148u16,
    "germandbls" => 149u16,
    "onesuperior" => 150u16,
    "logicalnot" => 151u16,
    "mu" => 152u16,
    "trademark" => 153u16,
    "Eth" => 154u16,
    "onehalf" => 155u16,
    "plusminus" => 156u16,
    "Thorn" => 157u16,
    "onequarter" => 158u16,
    "divide" => 159u16,
    "brokenbar" => 160u16,
    "degree" => 161u16,
    "thorn" => 162u16,
    "threequarters" => 163u16,
    "twosuperior" => 164u16,
    "registered" => 165u16,
    "minus" => 166u16,
    "eth" => 167u16,
    "multiply" => 168u16,
    "threesuperior" => 169u16,
    "copyright" => 170u16,
    "Aacute" => 171u16,
    "Acircumflex" => 172u16,
    "Adieresis" => 173u16,
    "Agrave" => 174u16,
    "Aring" => 175u16,
    "Atilde" => 176u16,
    "Ccedilla" => 177u16,
    "Eacute" => 178u16,
    "Ecircumflex" => 179u16,
    "Edieresis" => 180u16,
    "Egrave" => 181u16,
    "Iacute" => 182u16,
    "Icircumflex" => 183u16,
    "Idieresis" => 184u16,
    "Igrave" => 185u16,
    "Ntilde" => 186u16,
    "Oacute" => 187u16,
    "Ocircumflex" => 188u16,
    "Odieresis" => 189u16,
    "Ograve" => 190u16,
    "Otilde" => 191u16,
    "Scaron" => 192u16,
    "Uacute" => 193u16,
    "Ucircumflex" => 194u16,
    "Udieresis" => 195u16,
    "Ugrave" => 196u16,
    "Yacute" => 197u16,
    "Ydieresis" => 198u16,
    "Zcaron" => 199u16,
    "aacute" => 200u16,
    "acircumflex" => 201u16,
    "adieresis" => 202u16,
    "agrave" => 203u16,
    "aring" => 204u16,
    "atilde" => 205u16,
    "ccedilla" => 206u16,
    "eacute" => 207u16,
    "ecircumflex" => 208u16,
    "edieresis" => 209u16,
    "egrave" => 210u16,
    "iacute" => 211u16,
    "icircumflex" => 212u16,
    "idieresis" => 213u16,
    "igrave" => 214u16,
    "ntilde" => 215u16,
    "oacute" => 216u16,
    "ocircumflex" => 217u16,
    "odieresis" => 218u16,
    "ograve" => 219u16,
    "otilde" => 220u16,
    "scaron" => 221u16,
    "uacute" => 222u16,
    "ucircumflex" => 223u16,
    "udieresis" => 224u16,
    "ugrave" => 225u16,
    "yacute" => 226u16,
    "ydieresis" => 227u16,
    "zcaron" => 228u16,
    "exclamsmall" => 229u16,
    "Hungarumlautsmall" => 230u16,
    "dollaroldstyle" => 231u16,
    "dollarsuperior" => 232u16,
    "ampersandsmall" => 233u16,
    "Acutesmall" => 234u16,
    "parenleftsuperior" => 235u16,
    "parenrightsuperior" => 236u16,
    "twodotenleader" => 237u16,
    "onedotenleader" => 238u16,
    "zerooldstyle" => 239u16,
    "oneoldstyle" => 240u16,
    "twooldstyle" => 241u16,
    "threeoldstyle" => 242u16,
    "fouroldstyle" => 243u16,
    "fiveoldstyle" => 244u16,
    "sixoldstyle" => 245u16,
    "sevenoldstyle" => 246u16,
    "eightoldstyle" => 247u16,
    "nineoldstyle" => 248u16,
    "commasuperior" => 249u16,
    "threequartersemdash" => 250u16,
    "periodsuperior" => 251u16,
    "questionsmall" => 252u16,
    "asuperior" => 253u16,
    "bsuperior" => 254u16,
    "centsuperior" => 255u16,
    "dsuperior" => 256u16,
    "esuperior" => 257u16,
    "isuperior" => 258u16,
    "lsuperior" => 259u16,
    "msuperior" => 260u16,
    "nsuperior" => 261u16,
    "osuperior" => 262u16,
    "rsuperior" => 263u16,
    "ssuperior" => 264u16,
    "tsuperior" => 265u16,
    "ff" => 266u16,
    "ffi" => 267u16,
    "ffl" => 268u16,
    "parenleftinferior" => 269u16,
    "parenrightinferior" => 270u16,
    "Circumflexsmall" => 271u16,
    "hyphensuperior" => 272u16,
    "Gravesmall" => 273u16,
    "Asmall" => 274u16,
    "Bsmall" => 275u16,
    "Csmall" => 276u16,
    "Dsmall" => 277u16,
    "Esmall" => 278u16,
    "Fsmall" => 279u16,
    "Gsmall" => 280u16,
    "Hsmall" => 281u16,
    "Ismall" => 282u16,
    "Jsmall" => 283u16,
    "Ksmall" => 284u16,
    "Lsmall" => 285u16,
    "Msmall" => 286u16,
    "Nsmall" => 287u16,
    "Osmall" => 288u16,
    "Psmall" => 289u16,
    "Qsmall" => 290u16,
    "Rsmall" => 291u16,
    "Ssmall" => 292u16,
    "Tsmall" => 293u16,
    "Usmall" => 294u16,
    "Vsmall" => 295u16,
    "Wsmall" => 296u16,
    "Xsmall" => 297u16,
    "Ysmall" => 298u16,
    "Zsmall" => 299u16,
    "colonmonetary" => 300u16,
    "onefitted" => 301u16,
    "rupiah" => 302u16,
    "Tildesmall" => 303u16,
    "exclamdownsmall" => 304u16,
    "centoldstyle" => 305u16,
    "Lslashsmall" => 306u16,
    "Scaronsmall" => 307u16,
    "Zcaronsmall" => 308u16,
    "Dieresissmall" => 309u16,
    "Brevesmall" => 310u16,
    "Caronsmall" => 311u16,
    "Dotaccentsmall" => 312u16,
    "Macronsmall" => 313u16,
    "figuredash" => 314u16,
    "hypheninferior" => 315u16,
    "Ogoneksmall" => 316u16,
    "Ringsmall" => 317u16,
    "Cedillasmall" => 318u16,
    "questiondownsmall" => 319u16,
    "oneeighth" => 320u16,
    "threeeighths" => 321u16,
    "fiveeighths" => 322u16,
    "seveneighths" => 323u16,
    "onethird" => 324u16,
    "twothirds" => 325u16,
    "zerosuperior" => 326u16,
    "foursuperior" => 327u16,
    "fivesuperior" => 328u16,
    "sixsuperior" => 329u16,
    "sevensuperior" => 330u16,
    "eightsuperior" => 331u16,
    "ninesuperior" => 332u16,
    "zeroinferior" => 333u16,
    "oneinferior" => 334u16,
    "twoinferior" => 335u16,
    "threeinferior" => 336u16,
    "fourinferior" => 337u16,
    "fiveinferior" => 338u16,
    "sixinferior" => 339u16,
    "seveninferior" => 340u16,
    "eightinferior" => 341u16,
    "nineinferior" => 342u16,
    "centinferior" => 343u16,
    "dollarinferior" => 344u16,
    "periodinferior" => 345u16,
    "commainferior" => 346u16,
    "Agravesmall" => 347u16,
    "Aacutesmall" => 348u16,
    "Acircumflexsmall" => 349u16,
    "Atildesmall" => 350u16,
    "Adieresissmall" => 351u16,
    "Aringsmall" => 352u16,
    "AEsmall" => 353u16,
    "Ccedillasmall" => 354u16,
    "Egravesmall" => 355u16,
    "Eacutesmall" => 356u16,
    "Ecircumflexsmall" => 357u16,
    "Edieresissmall" => 358u16,
    "Igravesmall" => 359u16,
    "Iacutesmall" => 360u16,
    "Icircumflexsmall" => 361u16,
    "Idieresissmall" => 362u16,
    "Ethsmall" => 363u16,
    "Ntildesmall" => 364u16,
    "Ogravesmall" => 365u16,
    "Oacutesmall" => 366u16,
    "Ocircumflexsmall" => 367u16,
    "Otildesmall" => 368u16,
    "Odieresissmall" => 369u16,
    "OEsmall" => 370u16,
    "Oslashsmall" => 371u16,
    "Ugravesmall" => 372u16,
    "Uacutesmall" => 373u16,
    "Ucircumflexsmall" => 374u16,
    "Udieresissmall" => 375u16,
    "Yacutesmall" => 376u16,
    "Thornsmall" => 377u16,
    "Ydieresissmall" => 378u16,
    "001.000" => 379u16,
    "001.001" => 380u16,
    "001.002" => 381u16,
    "001.003" => 382u16,
    "Black" => 383u16,
    "Bold" => 384u16,
    "Book" => 385u16,
    "Light" => 386u16,
    "Medium" => 387u16,
    "Regular" => 388u16,
    "Roman" => 389u16,
    "Semibold" => 390u16,
};
