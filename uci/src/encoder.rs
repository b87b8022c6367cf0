use super::commands::{GoParams, UciCommand};

pub struct Encoder {}

impl Encoder {
    pub fn encode(&self, command: &UciCommand) -> String {
        match command {
            UciCommand::Uci => "uci".to_string(),
            UciCommand::IsReady => "isready".to_string(),
            UciCommand::UciNewGame => "ucinewgame".to_string(),

            UciCommand::Position { fen } => format!("position fen {}", fen),
            UciCommand::Go(params) => encode_go(params),

            UciCommand::Quit => "quit".to_string(),
            UciCommand::SetOption { name, value } => {
                if value.is_empty() {
                    format!("setoption name {}", name)
                } else {
                    format!("setoption name {} value {}", name, value)
                }
            }
        }
    }
}

fn encode_go(params: &GoParams) -> String {
    let mut line = String::from("go");

    if let Some(depth) = params.depth {
        line.push_str(&format!(" depth {}", depth));
    }
    if let Some(move_time) = params.move_time {
        line.push_str(&format!(" movetime {}", move_time));
    }

    line
}
