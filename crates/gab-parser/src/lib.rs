mod blocks;

pub use blocks::{
    parse_gab, parse_gab_collecting, parse_gab_file, parse_gab_file_collecting, strip_comment,
};
