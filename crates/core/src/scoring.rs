use serde::{Deserialize, Deserializer, Serialize};

/// Rounded percentage of `score` over `potential`, in `[0, 100]`.
///
/// A zero denominator yields 0. Responses are scored against a reference one
/// step further back than the one used to count potential matches, so the
/// raw ratio can exceed 1; it is clamped.
pub fn accuracy_percent(score: u32, potential: u32) -> u32 {
    if potential == 0 {
        return 0;
    }
    let pct = (score as f64 / potential as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}

/// Session-scoped counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    /// Confirmed channel matches.
    pub score: u32,
    pub incorrect_responses: u32,
    /// Snapshot of the running potential total taken at the start of the
    /// current turn.
    pub potential_correct_answers: u32,
    /// Running total of channel matches that existed in history.
    pub previous_potential_correct_answers: u32,
    pub n_back: u32,
    pub level: u32,
}

impl ScoreState {
    pub fn new(n_back: u32, level: u32) -> Self {
        Self {
            score: 0,
            incorrect_responses: 0,
            potential_correct_answers: 0,
            previous_potential_correct_answers: 0,
            n_back: n_back.max(1),
            level,
        }
    }

    pub fn record_correct(&mut self) {
        self.score += 1;
    }

    /// Returns the incorrect count after this response.
    pub fn record_incorrect(&mut self) -> u32 {
        self.incorrect_responses += 1;
        self.incorrect_responses
    }

    /// Start-of-turn snapshot of the running total.
    pub fn snapshot_potential(&mut self) {
        self.potential_correct_answers = self.previous_potential_correct_answers;
    }

    pub fn fold_potential(&mut self, matches: u32) {
        self.previous_potential_correct_answers += matches;
    }

    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.score, self.previous_potential_correct_answers)
    }

    pub fn result(&self) -> SessionResult {
        SessionResult {
            score: self.score,
            potential_correct_answers: self.previous_potential_correct_answers,
            n_back: self.n_back,
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(2, 1)
    }
}

/// Outcome of a finished session, as compared against the stored best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub score: u32,
    pub potential_correct_answers: u32,
    pub n_back: u32,
}

impl SessionResult {
    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.score, self.potential_correct_answers)
    }
}

/// Lag stored alongside the best session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordLag {
    /// Nothing recorded yet (`"nBack": null`). Any session lag beats it.
    #[default]
    Unset,
    /// Written by a high-score reset (no `nBack` key). Never beaten on lag
    /// alone, so only a strictly higher score replaces a reset record.
    Cleared,
    Lag(u32),
}

/// Best session ever completed on this device.
///
/// Stored as `{"score", "potentialCorrectAnswers", "nBack"}`. `nBack` is
/// `null` until a session has been recorded and absent after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "StoredRecord", into = "StoredRecord")]
pub struct HighScoreRecord {
    pub score: u32,
    pub potential_correct_answers: u32,
    pub n_back: RecordLag,
}

// Wire shape. `n_back` is `None` when the key is absent and `Some(None)` for
// an explicit `null`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    #[serde(default)]
    score: u32,
    #[serde(default)]
    potential_correct_answers: u32,
    #[serde(
        default,
        deserialize_with = "present_key",
        skip_serializing_if = "Option::is_none"
    )]
    n_back: Option<Option<u32>>,
}

fn present_key<'de, D>(deserializer: D) -> Result<Option<Option<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(Some)
}

impl From<StoredRecord> for HighScoreRecord {
    fn from(r: StoredRecord) -> Self {
        let n_back = match r.n_back {
            None => RecordLag::Cleared,
            Some(None) => RecordLag::Unset,
            Some(Some(n)) => RecordLag::Lag(n),
        };
        Self {
            score: r.score,
            potential_correct_answers: r.potential_correct_answers,
            n_back,
        }
    }
}

impl From<HighScoreRecord> for StoredRecord {
    fn from(r: HighScoreRecord) -> Self {
        let n_back = match r.n_back {
            RecordLag::Cleared => None,
            RecordLag::Unset => Some(None),
            RecordLag::Lag(n) => Some(Some(n)),
        };
        Self {
            score: r.score,
            potential_correct_answers: r.potential_correct_answers,
            n_back,
        }
    }
}

impl HighScoreRecord {
    pub fn from_result(result: &SessionResult) -> Self {
        Self {
            score: result.score,
            potential_correct_answers: result.potential_correct_answers,
            n_back: RecordLag::Lag(result.n_back),
        }
    }

    /// The record a high-score reset writes: zero score, lag cleared.
    pub fn cleared() -> Self {
        Self {
            n_back: RecordLag::Cleared,
            ..Self::default()
        }
    }

    /// Parse a stored record. Anything unreadable is treated as no record.
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str::<Option<Self>>(raw)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.score, self.potential_correct_answers)
    }

    /// Whether `result` replaces this record.
    ///
    /// Any one of: a higher score; an equal score with better accuracy; a
    /// longer lag than the record's, whatever the score. An unset lag loses
    /// to every session and a cleared one to none.
    ///
    /// Accuracies are compared after clamping, so two equal scores that both
    /// reach 100% or more tie and the newer one does not supersede.
    pub fn supersedes_with(&self, result: &SessionResult) -> bool {
        let higher_score = result.score > self.score;
        let better_accuracy = result.score == self.score && result.accuracy() > self.accuracy();
        let higher_n_back = match self.n_back {
            RecordLag::Lag(n) => result.n_back > n,
            RecordLag::Unset => true,
            RecordLag::Cleared => false,
        };
        higher_score || better_accuracy || higher_n_back
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: u32, potential: u32, n: u32) -> HighScoreRecord {
        HighScoreRecord {
            score,
            potential_correct_answers: potential,
            n_back: RecordLag::Lag(n),
        }
    }

    fn result(score: u32, potential: u32, n: u32) -> SessionResult {
        SessionResult {
            score,
            potential_correct_answers: potential,
            n_back: n,
        }
    }

    #[test]
    fn accuracy_rounds_and_guards_zero() {
        assert_eq!(accuracy_percent(0, 0), 0);
        assert_eq!(accuracy_percent(7, 0), 0);
        assert_eq!(accuracy_percent(5, 8), 63);
        assert_eq!(accuracy_percent(5, 10), 50);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(2, 3), 67);
    }

    #[test]
    fn accuracy_never_exceeds_one_hundred() {
        assert_eq!(accuracy_percent(9, 4), 100);
        assert_eq!(accuracy_percent(4, 4), 100);
    }

    #[test]
    fn equal_score_better_accuracy_supersedes() {
        assert!(record(5, 10, 2).supersedes_with(&result(5, 8, 2)));
    }

    #[test]
    fn higher_lag_alone_supersedes() {
        assert!(record(5, 10, 2).supersedes_with(&result(4, 10, 3)));
    }

    #[test]
    fn lower_score_same_lag_does_not_supersede() {
        assert!(!record(5, 10, 2).supersedes_with(&result(4, 10, 2)));
    }

    #[test]
    fn equal_everything_does_not_supersede() {
        assert!(!record(5, 10, 2).supersedes_with(&result(5, 10, 2)));
    }

    #[test]
    fn higher_score_supersedes_even_at_lower_lag() {
        assert!(record(5, 10, 3).supersedes_with(&result(6, 20, 2)));
    }

    #[test]
    fn empty_record_loses_to_any_session() {
        let empty = HighScoreRecord::default();
        assert!(empty.supersedes_with(&result(0, 0, 1)));
    }

    #[test]
    fn cleared_record_only_loses_to_a_higher_score() {
        let cleared = HighScoreRecord::cleared();
        assert!(!cleared.supersedes_with(&result(0, 0, 1)));
        assert!(!cleared.supersedes_with(&result(0, 4, 5)));
        assert!(cleared.supersedes_with(&result(1, 4, 2)));
    }

    #[test]
    fn ties_at_or_above_full_accuracy_do_not_supersede() {
        // 6/3 and 6/6 both clamp to 100%.
        assert!(!record(6, 6, 2).supersedes_with(&result(6, 3, 2)));
    }

    #[test]
    fn parse_falls_back_on_garbage() {
        assert_eq!(HighScoreRecord::parse("not json"), HighScoreRecord::default());
        assert_eq!(HighScoreRecord::parse("null"), HighScoreRecord::default());
        assert_eq!(HighScoreRecord::parse("42"), HighScoreRecord::default());
        assert_eq!(HighScoreRecord::parse(""), HighScoreRecord::default());
    }

    #[test]
    fn parse_reads_stored_shape() {
        let r = HighScoreRecord::parse(r#"{"score":5,"potentialCorrectAnswers":10,"nBack":2}"#);
        assert_eq!(r, record(5, 10, 2));

        let r = HighScoreRecord::parse(r#"{"score":0,"potentialCorrectAnswers":0,"nBack":null}"#);
        assert_eq!(r, HighScoreRecord::default());

        // Written by a reset: no nBack key.
        let r = HighScoreRecord::parse(r#"{"score":0,"potentialCorrectAnswers":0}"#);
        assert_eq!(r, HighScoreRecord::cleared());
    }

    #[test]
    fn record_serializes_in_camel_case() {
        let json = record(3, 4, 2).to_json().unwrap();
        assert_eq!(json, r#"{"score":3,"potentialCorrectAnswers":4,"nBack":2}"#);
        let json = HighScoreRecord::default().to_json().unwrap();
        assert_eq!(json, r#"{"score":0,"potentialCorrectAnswers":0,"nBack":null}"#);
        let json = HighScoreRecord::cleared().to_json().unwrap();
        assert_eq!(json, r#"{"score":0,"potentialCorrectAnswers":0}"#);
    }

    #[test]
    fn score_state_snapshot_lags_the_running_total() {
        let mut s = ScoreState::new(2, 1);
        s.snapshot_potential();
        s.fold_potential(2);
        assert_eq!(s.potential_correct_answers, 0);
        assert_eq!(s.previous_potential_correct_answers, 2);

        s.snapshot_potential();
        s.fold_potential(1);
        assert_eq!(s.potential_correct_answers, 2);
        assert_eq!(s.previous_potential_correct_answers, 3);
    }

    #[test]
    fn session_result_uses_running_total() {
        let mut s = ScoreState::new(3, 1);
        s.fold_potential(4);
        s.record_correct();
        s.record_correct();
        assert_eq!(s.record_incorrect(), 1);
        assert_eq!(s.result(), result(2, 4, 3));
        assert_eq!(s.accuracy(), 50);
    }
}
