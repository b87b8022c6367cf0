use super::commands::{Bound, EngineOutput, Info, Score};

pub struct Decoder;

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, input: &str) -> EngineOutput {
        match input {
            "uciok" => EngineOutput::UciOk,
            "readyok" => EngineOutput::ReadyOk,

            _ if input.starts_with("id name ") => {
                EngineOutput::IdName(input["id name ".len()..].trim().to_string())
            }
            _ if input.starts_with("id author ") => {
                EngineOutput::IdAuthor(input["id author ".len()..].trim().to_string())
            }
            _ if input.starts_with("bestmove") => self.decode_bestmove(input),
            _ if input.starts_with("info") => EngineOutput::Info(self.decode_info(input)),
            _ if input.starts_with("option") => EngineOutput::Option(input.to_string()),

            _ => EngineOutput::Unknown(input.to_string()),
        }
    }

    fn decode_bestmove(&self, input: &str) -> EngineOutput {
        let tokens: Vec<&str> = input.split_whitespace().collect();

        let best_move = tokens.get(1).copied().unwrap_or("(none)").to_string();
        let ponder = tokens
            .windows(2)
            .find(|w| w[0] == "ponder")
            .map(|w| w[1].to_string());

        EngineOutput::BestMove { best_move, ponder }
    }

    fn decode_info(&self, input: &str) -> Info {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let mut info = Info {
            raw: input.to_string(),
            ..Default::default()
        };

        let mut i = 1;
        while i < tokens.len() {
            match tokens[i] {
                "depth" => info.depth = parse_at(&tokens, i + 1),
                "seldepth" => info.sel_depth = parse_at(&tokens, i + 1),
                "multipv" => info.multi_pv = parse_at(&tokens, i + 1),
                "nodes" => info.nodes = parse_at(&tokens, i + 1),
                "nps" => info.nodes_per_second = parse_at(&tokens, i + 1),
                "time" => info.time = parse_at(&tokens, i + 1),
                "score" => {
                    let (score, consumed) = decode_score(&tokens[i + 1..]);
                    info.score = Some(score);
                    i += consumed;
                }
                "lowerbound" => info.bound = Some(Bound::Lower),
                "upperbound" => info.bound = Some(Bound::Upper),
                "pv" => {
                    info.pv = tokens[i + 1..].iter().map(|s| s.to_string()).collect();
                    break;
                }
                // Free text until the end of the line
                "string" => break,
                _ => {}
            }
            i += 1;
        }

        info
    }
}

/// Decodes the tokens following `score`. Returns the score and how many tokens it used.
fn decode_score(tokens: &[&str]) -> (Score, usize) {
    let kind = tokens.first().copied().unwrap_or("");
    let value = tokens.get(1).copied().unwrap_or("");

    let score = match (kind, value.parse::<i32>()) {
        ("cp", Ok(cp)) => Score::Centipawns(cp),
        ("mate", Ok(moves)) => Score::Mate(moves),
        _ => Score::Unrecognized(format!("{} {}", kind, value).trim().to_string()),
    };

    (score, tokens.len().min(2))
}

fn parse_at<T: std::str::FromStr>(tokens: &[&str], index: usize) -> Option<T> {
    tokens.get(index).and_then(|t| t.parse().ok())
}
