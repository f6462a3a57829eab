use penetapan_drafter::classify::is_judge_name;
use penetapan_drafter::{classify, Alignment, Rule, SectionState};

fn walk(lines: &[&str]) -> Vec<(Rule, SectionState)> {
    let mut state = SectionState::None;
    let mut prev = "";
    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let (class, next) = classify(line, i, prev, state);
        state = next;
        prev = line.trim();
        out.push((class.rule, state));
    }
    out
}

#[test]
fn disposition_is_left_only_by_closing_formula() {
    let steps = walk(&[
        "MENETAPKAN:",
        "SETELAH MEMBACA:",
        "MENIMBANG:",
        "1. Tetap butir amar",
        "DEMIKIANLAH, ditetapkan di Bandung",
        "1. Bukan butir",
    ]);
    let states: Vec<SectionState> = steps.iter().map(|s| s.1).collect();
    assert_eq!(
        states,
        vec![
            SectionState::InDisposition,
            SectionState::InDisposition,
            SectionState::InDisposition,
            SectionState::InDisposition,
            SectionState::None,
            SectionState::None,
        ]
    );
    // header styling still applies even though the state did not move
    assert_eq!(steps[1].0, Rule::SectionHeader);
    assert_eq!(steps[3].0, Rule::ListItem);
    assert_eq!(steps[5].0, Rule::Default);
}

#[test]
fn noting_header_only_ends_considerations() {
    let steps = walk(&["SETELAH MEMBACA:", "Memperhatikan:", "MENIMBANG:", "Memperhatikan:"]);
    let states: Vec<SectionState> = steps.iter().map(|s| s.1).collect();
    assert_eq!(
        states,
        vec![SectionState::InReading, SectionState::InReading, SectionState::InConsiderations, SectionState::None]
    );
}

#[test]
fn headers_match_exactly_after_trim() {
    let steps = walk(&["  SETELAH MEMBACA:  ", "Setelah membaca:", "MENIMBANG: tambahan"]);
    assert_eq!(steps[0].1, SectionState::InReading);
    assert_eq!(steps[1].1, SectionState::InReading);
    assert_eq!(steps[2].1, SectionState::InReading);
}

#[test]
fn list_markers_need_a_list_section() {
    let steps = walk(&["1. Bebas", "SETELAH MEMBACA:", "1) Butir", "- Butir", "Bukan butir"]);
    assert_eq!(steps[0].0, Rule::Default);
    assert_eq!(steps[2].0, Rule::ListItem);
    assert_eq!(steps[3].0, Rule::ListItem);
    assert_eq!(steps[4].0, Rule::Default);
}

#[test]
fn fixed_phrases_are_styled() {
    let steps = walk(&[
        "PENGADILAN NEGERI BANDUNG",
        "PENETAPAN",
        "Nomor 1/Pdt.Eks/2024/PN Bdg",
        "DEMI KEADILAN BERDASARKAN KETUHANAN YANG MAHA ESA",
        "Lawan",
        "Perincian Biaya:",
        "DALAM POKOK PERKARA :",
    ]);
    let rules: Vec<Rule> = steps.iter().map(|s| s.0).collect();
    assert_eq!(
        rules,
        vec![
            Rule::CourtName,
            Rule::Title,
            Rule::CaseNumber,
            Rule::DivineJustice,
            Rule::Separator,
            Rule::CostHeading,
            Rule::VerdictHeader,
        ]
    );
}

#[test]
fn title_is_bold_centered_caps() {
    let (c, _) = classify("PENETAPAN", 2, "", SectionState::None);
    assert_eq!(c.alignment, Alignment::Center);
    assert!(c.bold && c.all_caps && !c.underline);
}

#[test]
fn party_line_needs_semicolon_and_known_role() {
    let (c, _) = classify("  Jane Doe, sebagai Termohon Eksekusi;  ", 9, "", SectionState::InReading);
    assert_eq!(c.rule, Rule::PartyLine);
    let (c, _) = classify("Jane Doe, sebagai Pemohon Eksekusi", 9, "", SectionState::None);
    assert_eq!(c.rule, Rule::Default);
    let (c, _) = classify("Jane Doe, sebagai Penggugat;", 9, "", SectionState::None);
    assert_eq!(c.rule, Rule::Default);
}

#[test]
fn judge_name_needs_chair_line_above() {
    assert!(is_judge_name("Wahyu Iman Santoso, S.H., M.H.", "KETUA PENGADILAN NEGERI BANDUNG"));
    assert!(!is_judge_name("Wahyu Iman Santoso, S.H., M.H.", ""));
    assert!(!is_judge_name("Wahyu Iman Santoso, M.H.", "KETUA PENGADILAN NEGERI BANDUNG"));
    assert!(!is_judge_name("Nomor 12, S.H.", "KETUA"));
}

#[test]
fn degree_line_under_any_ketua_line_counts_as_judge() {
    // the heuristic cannot tell a judge from other degree-holders
    let (c, _) = classify("Advokat Budi, S.H.", 40, "KETUA RT", SectionState::None);
    assert_eq!(c.rule, Rule::JudgeName);
    // non-ASCII letters fall outside the accepted character set
    assert!(!is_judge_name("Dédé Sunarya, S.H.", "KETUA PENGADILAN NEGERI BANDUNG"));
}

#[test]
fn blank_line_keeps_state() {
    let (c, s) = classify("   ", 10, "", SectionState::InConsiderations);
    assert_eq!(c.rule, Rule::Blank);
    assert_eq!(s, SectionState::InConsiderations);
}
