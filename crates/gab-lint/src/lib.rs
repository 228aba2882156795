mod checks;
mod graph;
mod regions;
mod report;
mod workspace;

pub use checks::{lint_commands, lint_gates, lint_speakers, UndefinedSpeaker, UnknownGate};
pub use graph::{
    default_terminating_commands, validate_gab, validate_gab_with, DanglingReference,
    GabValidation, UntargetedOption,
};
pub use regions::{
    lint_room_regions, load_room_regions, validate_examine_region, ExamineRegion, RegionFinding,
    RegionKind, RoomRegions,
};
pub use report::{lint_script, title_line, LintFinding, LintReport, Severity};
pub use workspace::{lint_directory, read_gab_sources, DirectoryReport, FileReport};
