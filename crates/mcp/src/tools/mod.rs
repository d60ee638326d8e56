pub mod calculator;
pub mod datetime;
pub mod filesystem;
pub mod restaurant;
pub mod text;
mod registry;

pub use calculator::{calculator_tools, CalculatorTool, Operation};
pub use datetime::{datetime_tools, CurrentDateTimeTool, TimestampTool};
pub use filesystem::{
    describe_fs_error, filesystem_tools, DeleteFileTool, ListFilesTool, ReadFileTool,
    WriteFileTool,
};
pub use registry::{
    json_schema_number, json_schema_object, json_schema_string, Tool, ToolRegistry, ToolTier,
};
pub use restaurant::{
    restaurant_tools, ListRestaurantsTool, RestaurantTable, RestaurantsByCategoryTool,
    SearchRestaurantTool,
};
pub use text::{text_tools, TextOperation, TextTool};
