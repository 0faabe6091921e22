//! Closed word lists shared by the feature extractor, the rule filters and the decoder.
//!
//! The feature-related lists must stay identical to the ones the weights were trained with.

/// Measurement units and packaging words.
pub const UNITS: &[&str] = &[
    "kg", "kilo", "gram", "gr", "ons", "liter", "ltr", "ml", "pcs", "sak", "zak", "dus", "buah",
    "bks", "pack", "rit", "cm", "m", "mm", "lembar", "btg", "bungkus", "kotak", "botol", "galon",
    "set", "pasang", "lsn", "kodi", "ikat",
];

/// Units that mark the preceding number as a quantity.
pub const MEASURE_UNITS: &[&str] = &[
    "kg", "gram", "ltr", "liter", "pcs", "sak", "zak", "dus", "buah", "bks", "bungkus", "pack",
    "ons",
];

/// Transaction verbs, including regional variants.
pub const VERBS: &[&str] = &[
    "beli", "pesan", "order", "butuh", "cari", "minta", "ambil", "jual", "laku", "keluar", "masuk",
    "dapat", "income", "terjual", "bayar", "belanja", "biaya", "ongkos", "tuku", "tumbas", "mundut",
    "jupuk", "meser", "ngagaleuh", "meuli", "bloe", "cok", "lakee",
];

/// Words that follow a price in colloquial notation.
pub const MONEY_SUFFIXES: &[&str] = &[
    "rb", "k", "ribu", "rebu", "ribee", "rebe", "jt", "juta", "000", "rp", "perak", "cepek",
    "gopek", "seceng", "goceng", "ceban", "goban",
];

/// Filler words that never name an item.
pub const NOISE: &[&str] = &[
    "bang", "mas", "pak", "bu", "mbak", "kak", "om", "tolong", "dong", "ya", "yuk", "nih", "tuh",
    "sih", "deh", "kok", "besok", "kemarin", "nanti", "sekarang", "ini", "itu", "yang", "dan",
    "sama", "buat",
];

/// Tokens that close the item being collected.
pub const SEPARATORS: &[&str] = &[",", "dan", "lalu", "serta", "plus", "juga", "sama"];

/// Scale suffixes worth a thousand.
pub const THOUSAND_SUFFIXES: &[&str] = &["ribee", "ribu", "rebu", "rb", "k"];

/// Scale suffixes worth a million.
pub const MILLION_SUFFIXES: &[&str] = &["juta", "juti", "jt"];

/// Slang denominations and their values in rupiah.
pub const DENOMINATIONS: &[(&str, f64)] = &[
    ("cepek", 100.),
    ("gopek", 500.),
    ("seceng", 1000.),
    ("noceng", 2000.),
    ("goceng", 2000.),
    ("ceban", 10000.),
    ("goban", 50000.),
];

/// Regional numeral prefixes that may precede a spelled-out scale ("sarebu", "duajuta").
pub const NUMERAL_PREFIXES: &[(&str, f64)] = &[
    ("sa", 1.),
    ("se", 1.),
    ("si", 1.),
    ("dua", 2.),
    ("dwa", 2.),
];

/// Spelled-out quantities.
pub const QUANTITY_WORDS: &[(&str, u32)] = &[
    ("satu", 1),
    ("dua", 2),
    ("tiga", 3),
    ("empat", 4),
    ("lima", 5),
    ("enam", 6),
    ("tujuh", 7),
    ("delapan", 8),
    ("sembilan", 9),
    ("sepuluh", 10),
    ("selusin", 12),
];

/// Keywords marking money coming in. Checked before [`EXPENSE_KEYWORDS`].
pub const INCOME_KEYWORDS: &[&str] = &[
    "terjual",
    "laku",
    "masuk",
    "pendapatan",
    "jual",
    "dapat",
    "income",
];

/// Keywords marking money going out.
pub const EXPENSE_KEYWORDS: &[&str] = &["beli", "belanja", "keluar", "bayar", "expense", "biaya"];

/// Full month names. The first three letters are the accepted abbreviation.
pub const MONTHS: &[&str] = &[
    "januari",
    "februari",
    "maret",
    "april",
    "mei",
    "juni",
    "juli",
    "agustus",
    "september",
    "oktober",
    "november",
    "desember",
];

pub const WEEKDAYS: &[&str] = &["senin", "selasa", "rabu", "kamis", "jumat", "sabtu", "minggu"];

#[inline]
pub fn is_unit(word: &str) -> bool {
    UNITS.contains(&word)
}

#[inline]
pub fn is_measure_unit(word: &str) -> bool {
    MEASURE_UNITS.contains(&word)
}

#[inline]
pub fn is_verb(word: &str) -> bool {
    VERBS.contains(&word)
}

#[inline]
pub fn is_money_suffix(word: &str) -> bool {
    MONEY_SUFFIXES.contains(&word)
}

#[inline]
pub fn is_noise(word: &str) -> bool {
    NOISE.contains(&word)
}

#[inline]
pub fn is_separator(word: &str) -> bool {
    SEPARATORS.contains(&word)
}

/// Returns the multiplier of a bare scale word such as `rb` or `juta`.
pub fn scale_of(word: &str) -> Option<f64> {
    if THOUSAND_SUFFIXES.contains(&word) {
        Some(1_000.)
    } else if MILLION_SUFFIXES.contains(&word) {
        Some(1_000_000.)
    } else {
        None
    }
}

pub fn quantity_word(word: &str) -> Option<u32> {
    QUANTITY_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|&(_, n)| n)
}
