//! Daily duas shown alongside the schedule.

use crate::i18n::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dua {
    pub title: &'static str,
    pub title_bn: &'static str,
    pub arabic: &'static str,
    pub transliteration: &'static str,
    pub translation: &'static str,
    pub translation_bn: &'static str,
}

impl Dua {
    pub fn title(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.title,
            Language::Bn => self.title_bn,
        }
    }

    pub fn translation(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.translation,
            Language::Bn => self.translation_bn,
        }
    }
}

pub const DAILY_DUAS: [Dua; 3] = [
    Dua {
        title: "Dua for Fasting (Sehri)",
        title_bn: "রোজার নিয়ত (সেহরি)",
        arabic: "وَبِصَوْمِ غَدٍ نَّوَيْتُ مِنْ شَهْرِ رَمَضَانَ",
        transliteration: "Wa bisawmi ghadinn nawaiytu min shahri ramadan",
        translation: "I intend to keep the fast for tomorrow in the month of Ramadan.",
        translation_bn: "আমি আগামীকাল পবিত্র রমজান মাসের রোজা রাখার নিয়ত করলাম।",
    },
    Dua {
        title: "Dua for Breaking Fast (Iftar)",
        title_bn: "ইফতারের দোয়া",
        arabic: "اللَّهُمَّ اِنِّى لَكَ صُمْتُ وَبِكَ امنْتُ وَعَلَيْكَ تَوَكَّلْتُ وَعَلَى رِزْقِكَ اَفْطَرْتُ",
        transliteration: "Allahumma inni laka sumtu wa bika aamantu wa 'alayka tawakkaltu wa 'ala rizq-ika -aftartu",
        translation: "O Allah! I fasted for You and I believe in You and I put my trust in You and I break my fast with Your sustenance.",
        translation_bn: "হে আল্লাহ! আমি তোমারই সন্তুষ্টির জন্য রোজা রেখেছি, তোমার ওপর ঈমান এনেছি, তোমার ওপর ভরসা করেছি এবং তোমারই দেওয়া রিজিক দিয়ে ইফতার করছি।",
    },
    Dua {
        title: "Dua for the First 10 Days (Mercy)",
        title_bn: "প্রথম ১০ দিনের দোয়া (রহমত)",
        arabic: "رَبِّ اغْفِرْ وَارْحَمْ وَأَنْتَ خَيْرُ الرَّاحِمِينَ",
        transliteration: "Rabbighfir warham wa anta khairur raahimeen",
        translation: "O My Lord, forgive me and have mercy on me, You are the best of the Merciful.",
        translation_bn: "হে আমার রব! আমাকে ক্ষমা করুন এবং আমার প্রতি রহমত বর্ষণ করুন। আপনিই তো সর্বশ্রেষ্ঠ দয়ালু।",
    },
];

/// Position of `index` in the list, wrapping in both directions.
pub fn wrap_index(index: i64) -> usize {
    index.rem_euclid(DAILY_DUAS.len() as i64) as usize
}

/// Dua at `index`, wrapping past either end.
pub fn dua_at(index: i64) -> &'static Dua {
    &DAILY_DUAS[wrap_index(index)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepping_forward_wraps_to_first() {
        assert_eq!(wrap_index(1), 1);
        assert_eq!(wrap_index(DAILY_DUAS.len() as i64), 0);
    }

    #[test]
    fn test_stepping_back_wraps_to_last() {
        assert_eq!(wrap_index(-1), DAILY_DUAS.len() - 1);
        assert_eq!(wrap_index(-4), DAILY_DUAS.len() - 1);
    }

    #[test]
    fn test_dua_at_wraps_both_ways() {
        assert_eq!(dua_at(0), &DAILY_DUAS[0]);
        assert_eq!(dua_at(3), &DAILY_DUAS[0]);
        assert_eq!(dua_at(-1), &DAILY_DUAS[2]);
        assert_eq!(dua_at(7).title, "Dua for Breaking Fast (Iftar)");
    }

    #[test]
    fn test_localized_fields() {
        let dua = dua_at(1);
        assert_eq!(dua.title(Language::En), "Dua for Breaking Fast (Iftar)");
        assert_eq!(dua.title(Language::Bn), "ইফতারের দোয়া");
        assert!(dua.translation(Language::Bn).starts_with("হে আল্লাহ!"));
    }

    #[test]
    fn test_every_dua_is_complete() {
        for dua in &DAILY_DUAS {
            assert!(!dua.arabic.is_empty());
            assert!(!dua.transliteration.is_empty());
            assert!(!dua.translation.is_empty());
            assert!(!dua.translation_bn.is_empty());
        }
    }
}
