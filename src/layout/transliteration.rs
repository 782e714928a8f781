// SPDX-License-Identifier: GPL-3.0-only

//! Latin captions shown under keys when transliteration is enabled.

/// Returns the latinized approximation of a key label.
///
/// Labels missing from the table are returned unchanged.
#[must_use]
pub fn transliterate(label: &str) -> &str {
    match label {
        "ض" => "ḍ",
        "ص" => "ṣ",
        "ث" => "th",
        "ق" => "q",
        "ف" => "f",
        "غ" => "gh",
        "ع" => "ʿ",
        "ه" => "h",
        "خ" => "kh",
        "ح" => "ḥ",
        "ج" => "j",
        "د" => "d",
        "ش" => "sh",
        "س" => "s",
        "ي" => "y",
        "ب" => "b",
        "ل" => "l",
        "ا" => "a",
        "ت" => "t",
        "ن" => "n",
        "م" => "m",
        "ك" => "k",
        "ط" => "ṭ",
        "ئ" | "ء" | "ؤ" => "ʼ",
        "ر" => "r",
        "لا" => "la",
        "ى" => "á",
        "ة" => "h",
        "و" => "w",
        "ز" => "z",
        "ظ" => "ẓ",
        " " => "␣",
        other => other,
    }
}
