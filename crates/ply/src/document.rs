use crate::error::Result;
use ply_graph::{Game, Snapshot};

/// Parses a state document: a game (`{"states": [...]}`), a bare array of snapshots, or a single
/// snapshot.
pub fn parse_states(json: &str) -> Result<Vec<Snapshot>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let is_game = value.get("states").is_some();
    let states = if value.is_array() {
        serde_json::from_value::<Vec<Snapshot>>(value)?
    } else if is_game {
        serde_json::from_value::<Game>(value)?.states
    } else {
        vec![serde_json::from_value::<Snapshot>(value)?]
    };
    tracing::debug!(states = states.len(), "parsed state document");
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_three_shapes() {
        let snapshot = r#"{"move":"e4","nodes":[{"id":"e4"}],"edges":[]}"#;
        assert_eq!(parse_states(snapshot).unwrap().len(), 1);
        assert_eq!(
            parse_states(&format!("[{snapshot},{snapshot}]")).unwrap().len(),
            2
        );
        let game = parse_states(&format!(r#"{{"states":[{snapshot}]}}"#)).unwrap();
        assert_eq!(game[0].move_label.as_deref(), Some("e4"));
        assert!(parse_states("{").is_err());
    }
}
