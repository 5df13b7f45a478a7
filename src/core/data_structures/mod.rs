/*!
 * Data Structures
 *
 * - CommName: inline, kernel-sized command name (at most 15 bytes)
 */

mod comm_name;

pub use comm_name::CommName;
