use gab_core::GabError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> GabError {
    GabError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: GabError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).expect("string json")
    );
    if let Some(line) = error.line {
        println!("ERROR_LINE:{}", line);
    }
    1
}

pub(crate) fn map_play_io(error: std::io::Error) -> GabError {
    map_error("CLI_PLAY_IO", error)
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> GabError {
    map_error("CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> GabError {
    map_error("CLI_SOURCE_READ", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(GabError::with_line("PARSE_UNKNOWN_METADATA", "bad", 3));
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(map_play_io(std::io::Error::other("io")).code, "CLI_PLAY_IO");
        assert_eq!(
            map_cli_source_path(std::io::Error::other("path")).code,
            "CLI_SOURCE_PATH"
        );
        assert_eq!(
            map_cli_source_read(std::io::Error::other("read")).code,
            "CLI_SOURCE_READ"
        );
    }
}
