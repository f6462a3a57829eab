use serde::{Deserialize, Serialize};

/// Literal lines the generated text is expected to reproduce verbatim.
/// Matching is exact on the trimmed line; no case folding.
pub const COURT_PREFIX: &str = "PENGADILAN NEGERI";
pub const TITLE: &str = "PENETAPAN";
pub const CASE_NUMBER_PREFIX: &str = "Nomor ";
pub const DIVINE_JUSTICE: &str = "DEMI KEADILAN BERDASARKAN KETUHANAN YANG MAHA ESA";
pub const READING_HEADER: &str = "SETELAH MEMBACA:";
pub const CONSIDERING_HEADER: &str = "MENIMBANG:";
pub const NOTING_HEADER: &str = "Memperhatikan:";
pub const DISPOSITION_HEADER: &str = "MENETAPKAN:";
pub const CLOSING_PREFIX: &str = "DEMIKIANLAH";
pub const COURT_CHAIR_PREFIX: &str = "KETUA PENGADILAN";
pub const JUDGE_PRECEDED_BY: &str = "KETUA";
pub const LEGAL_DEGREE: &str = "S.H.";
pub const COST_HEADING: &str = "Perincian Biaya:";
pub const COST_MARKER: &str = "[TAB]";
pub const SEPARATORS: [&str; 2] = ["Lawan", "MELAWAN"];
pub const VERDICT_HEADERS: [&str; 4] = [
    "MENGADILI:",
    "DALAM KONVENSI :",
    "DALAM EKSEPSI :",
    "DALAM POKOK PERKARA :",
];

/// Which logical section of the court document the current line belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionState {
    #[default]
    None,
    InReading,
    InConsiderations,
    InDisposition,
}

impl SectionState {
    /// Pure transition on one trimmed line.
    ///
    /// - the closing formula clears every state;
    /// - once in the disposition only the closing formula leaves it;
    /// - the reading and considerations headers replace whatever came before;
    /// - "Memperhatikan:" only ends the considerations;
    /// - the disposition header replaces whatever came before.
    pub fn next(self, trimmed: &str) -> SectionState {
        if trimmed.starts_with(CLOSING_PREFIX) {
            return SectionState::None;
        }
        if self == SectionState::InDisposition {
            return self;
        }
        match trimmed {
            READING_HEADER => SectionState::InReading,
            CONSIDERING_HEADER => SectionState::InConsiderations,
            NOTING_HEADER if self == SectionState::InConsiderations => SectionState::None,
            DISPOSITION_HEADER => SectionState::InDisposition,
            _ => self,
        }
    }

    /// Sections whose ordinal/bullet lines become numbered list items.
    pub fn takes_list_items(self) -> bool {
        matches!(self, SectionState::InReading | SectionState::InDisposition)
    }
}

pub fn is_verdict_header(trimmed: &str) -> bool {
    VERDICT_HEADERS.contains(&trimmed)
}
