// Library root: fair team assembly for classroom drafts.
//
// Raw measurements are normalized into comparable scores, then players are
// allocated to captain-seeded teams through a snake draft with category
// quotas and full undo.

pub mod config;
pub mod draft;
pub mod player;
pub mod roster;
pub mod valuation;
