//! Static code tables used to describe chassis type and language code fields.

/// A chassis type code and its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChassisType {
    pub code: u8,
    pub info: &'static str,
}

/// A language code with its two-letter short name and full name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageCode {
    pub code: u8,
    pub short_name: &'static str,
    pub full_name: &'static str,
}

const fn ct(code: u8, info: &'static str) -> ChassisType {
    ChassisType { code, info }
}

const fn lc(code: u8, short_name: &'static str, full_name: &'static str) -> LanguageCode {
    LanguageCode {
        code,
        short_name,
        full_name,
    }
}

pub static CHASSIS_TYPES: [ChassisType; 29] = [
    ct(0x01, "Other"),
    ct(0x02, "Unknown"),
    ct(0x03, "Desktop"),
    ct(0x04, "Low Profile Desktop"),
    ct(0x05, "Pizza Box"),
    ct(0x06, "Mini Tower"),
    ct(0x07, "Tower"),
    ct(0x08, "Portable"),
    ct(0x09, "LapTop"),
    ct(0x0A, "Notebook"),
    ct(0x0B, "Hand Held"),
    ct(0x0C, "Docking Station"),
    ct(0x0D, "All in One"),
    ct(0x0E, "Sub Notebook"),
    ct(0x0F, "Space-saving"),
    ct(0x10, "Lunch Box"),
    ct(0x11, "Main Server Chassis"),
    ct(0x12, "Expansion Chassis"),
    ct(0x13, "SubChassis"),
    ct(0x14, "Bus Expansion Chassis"),
    ct(0x15, "Peripheral Chassis"),
    ct(0x16, "RAID Chassis"),
    ct(0x17, "Rack Mount Chassis"),
    ct(0x18, "Sealed-case PC"),
    ct(0x19, "Multi-system chassis"),
    ct(0x1A, "Compact PCI"),
    ct(0x1B, "Advanced TCA"),
    ct(0x1C, "Blade"),
    ct(0x1D, "Blade Enclosure"),
];

// Code 0 is English as well; 25 is the explicit "en" entry.
pub static LANGUAGE_CODES: [LanguageCode; 137] = [
    lc(0, "en", "English"),
    lc(1, "aa", "Afar"),
    lc(2, "ab", "Abkhazian"),
    lc(3, "af", "Afrikaans"),
    lc(4, "am", "Amharic"),
    lc(5, "ar", "Arabic"),
    lc(6, "as", "Assamese"),
    lc(7, "ay", "Aymara"),
    lc(8, "az", "Azerbaijani"),
    lc(9, "ba", "Bashkir"),
    lc(10, "be", "Byelorussian"),
    lc(11, "bg", "Bulgarian"),
    lc(12, "bh", "Bihari"),
    lc(13, "bi", "Bislama"),
    lc(14, "bn", "Bengali; Bangla"),
    lc(15, "bo", "Tibetan"),
    lc(16, "br", "Breton"),
    lc(17, "ca", "Catalan"),
    lc(18, "co", "Corsican"),
    lc(19, "cs", "Czech"),
    lc(20, "cy", "Welsh"),
    lc(21, "da", "Danish"),
    lc(22, "de", "German"),
    lc(23, "dz", "Bhutani"),
    lc(24, "el", "Greek"),
    lc(25, "en", "English"),
    lc(26, "eo", "Esperanto"),
    lc(27, "es", "Spanish"),
    lc(28, "et", "Estonian"),
    lc(29, "eu", "Basque"),
    lc(30, "fa", "Persian"),
    lc(31, "fi", "Finnish"),
    lc(32, "fj", "Fiji"),
    lc(33, "fo", "Faeroese"),
    lc(34, "fr", "French"),
    lc(35, "fy", "Frisian"),
    lc(36, "ga", "Irish"),
    lc(37, "gd", "Scots Gaelic"),
    lc(38, "gl", "Galician"),
    lc(39, "gn", "Guarani"),
    lc(40, "gu", "Gujarati"),
    lc(41, "ha", "Hausa"),
    lc(42, "hi", "Hindi"),
    lc(43, "hr", "Croatian"),
    lc(44, "hu", "Hungarian"),
    lc(45, "hy", "Armenian"),
    lc(46, "ia", "Interlingua"),
    lc(47, "ie", "Interlingue"),
    lc(48, "ik", "Inupiak"),
    lc(49, "in", "Indonesian"),
    lc(50, "is", "Icelandic"),
    lc(51, "it", "Italian"),
    lc(52, "iw", "Hebrew"),
    lc(53, "ja", "Japanese"),
    lc(54, "ji", "Yiddish"),
    lc(55, "jw", "Javanese"),
    lc(56, "ka", "Georgian"),
    lc(57, "kk", "Kazakh"),
    lc(58, "kl", "Greenlandic"),
    lc(59, "km", "Cambodian"),
    lc(60, "kn", "Kannada"),
    lc(61, "ko", "Korean"),
    lc(62, "ks", "Kashmiri"),
    lc(63, "ku", "Kurdish"),
    lc(64, "ky", "Kirghiz"),
    lc(65, "la", "Latin"),
    lc(66, "ln", "Lingala"),
    lc(67, "lo", "Laothian"),
    lc(68, "lt", "Lithuanian"),
    lc(69, "lv", "Latvian, Lettish"),
    lc(70, "mg", "Malagasy"),
    lc(71, "mi", "Maori"),
    lc(72, "mk", "Macedonian"),
    lc(73, "ml", "Malayalam"),
    lc(74, "mn", "Mongolian"),
    lc(75, "mo", "Moldavian"),
    lc(76, "mr", "Marathi"),
    lc(77, "ms", "Malay"),
    lc(78, "mt", "Maltese"),
    lc(79, "my", "Burmese"),
    lc(80, "na", "Nauru"),
    lc(81, "ne", "Nepali"),
    lc(82, "nl", "Dutch"),
    lc(83, "no", "Norwegian"),
    lc(84, "oc", "Occitan"),
    lc(85, "om", "(Afan) Oromo"),
    lc(86, "or", "Oriya"),
    lc(87, "pa", "Punjabi"),
    lc(88, "pl", "Polish"),
    lc(89, "ps", "Pashto, Pushto"),
    lc(90, "pt", "Portuguese"),
    lc(91, "qu", "Quechua"),
    lc(92, "rm", "Rhaeto-Romance"),
    lc(93, "rn", "Kirundi"),
    lc(94, "ro", "Romanian"),
    lc(95, "ru", "Russian"),
    lc(96, "rw", "Kinyarwanda"),
    lc(97, "sa", "Sanskrit"),
    lc(98, "sd", "Sindhi"),
    lc(99, "sg", "Sangro"),
    lc(100, "sh", "Serbo-Croatian"),
    lc(101, "si", "Singhalese"),
    lc(102, "sk", "Slovak"),
    lc(103, "sl", "Slovenian"),
    lc(104, "sm", "Samoan"),
    lc(105, "sn", "Shona"),
    lc(106, "so", "Somali"),
    lc(107, "sq", "Albanian"),
    lc(108, "sr", "Serbian"),
    lc(109, "ss", "Siswati"),
    lc(110, "st", "Sesotho"),
    lc(111, "su", "Sudanese"),
    lc(112, "sv", "Swedish"),
    lc(113, "sw", "Swahili"),
    lc(114, "ta", "Tamil"),
    lc(115, "te", "Tegulu"),
    lc(116, "tg", "Tajik"),
    lc(117, "th", "Thai"),
    lc(118, "ti", "Tigrinya"),
    lc(119, "tk", "Turkmen"),
    lc(120, "tl", "Tagalog"),
    lc(121, "tn", "Setswana"),
    lc(122, "to", "Tonga"),
    lc(123, "tr", "Turkish"),
    lc(124, "ts", "Tsonga"),
    lc(125, "tt", "Tatar"),
    lc(126, "tw", "Twi"),
    lc(127, "uk", "Ukrainian"),
    lc(128, "ur", "Urdu"),
    lc(129, "uz", "Uzbek"),
    lc(130, "vi", "Vietnamese"),
    lc(131, "vo", "Volapuk"),
    lc(132, "wo", "Wolof"),
    lc(133, "xh", "Xhosa"),
    lc(134, "yo", "Yoruba"),
    lc(135, "zh", "Chinese"),
    lc(136, "zu", "Zulu"),
];

/// Looks up the display name of a chassis type code.
pub fn chassis_type(code: u8) -> Option<&'static ChassisType> {
    CHASSIS_TYPES.iter().find(|entry| entry.code == code)
}

/// Looks up a language code.
pub fn language_code(code: u8) -> Option<&'static LanguageCode> {
    LANGUAGE_CODES.iter().find(|entry| entry.code == code)
}

/// One line per chassis type, `code - info`.
pub fn list_chassis_types() -> String {
    CHASSIS_TYPES
        .iter()
        .map(|entry| format!("{:<4} - {:<25}\n", entry.code, entry.info))
        .collect()
}

/// One line per language code, `short code full`.
pub fn list_language_codes() -> String {
    LANGUAGE_CODES
        .iter()
        .map(|entry| format!("{} {} {}\n", entry.short_name, entry.code, entry.full_name))
        .collect()
}
