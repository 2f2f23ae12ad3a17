// Display labels for mode and criterion keys

/// Modes the evaluator is known to accept. Display and help text only;
/// unknown modes are passed through and rejected (or not) remotely.
pub const KNOWN_MODES: &[&str] = &[
    "ranking",
    "saw",
    "valor_esperado",
    "expected_value",
    "maximin",
    "maximax",
    "laplace",
    "hurwicz",
    "minimax_regret",
];

/// Human label for a decision criterion key. Unknown keys come back verbatim.
pub fn criterion_label(key: &str) -> &str {
    match key {
        "maximax" => "Maximax",
        "maximin" => "Maximin",
        "laplace" => "Laplace",
        "hurwicz" => "Hurwicz",
        "minimax_regret" => "Minimax Regret",
        "valor_esperado" => "Valor Esperado",
        other => other,
    }
}

/// Human label for a mode key. Unknown keys come back verbatim.
pub fn mode_label(key: &str) -> &str {
    match key {
        "riesgo" => "Riesgo",
        "incertidumbre" => "Incertidumbre",
        "certidumbre" => "Certidumbre",
        other => other,
    }
}
