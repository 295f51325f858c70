mod centerline;
mod clean;
mod connect;
mod convert;
mod extract;
mod filter;
mod info;
mod narrow;
mod reproject;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// convert claim shapefiles to a GeoJSON property collection
    Convert(convert::ConvertCommand),
    /// reproject a GeoJSON file between coordinate systems
    Reproject(reproject::ReprojectCommand),
    /// extract colored line work from a scanned GeoTIFF map
    Extract(extract::ExtractCommand),
    /// despike, smooth and simplify extracted line segments
    Clean(clean::CleanCommand),
    /// connect line segments across small gaps
    Connect(connect::ConnectCommand),
    /// rebuild centerlines from double-edged contour traces
    Centerline(centerline::CenterlineCommand),
    /// keep only the main line segments
    Filter(filter::FilterCommand),
    /// narrow the V-turn of a boundary polygon
    Narrow(narrow::NarrowCommand),
    /// print a summary of the segments in a GeoJSON file
    Info(info::InfoCommand),
}

impl Commands {
    pub fn run(self) {
        match self {
            Commands::Convert(command) => command.run(),
            Commands::Reproject(command) => command.run(),
            Commands::Extract(command) => command.run(),
            Commands::Clean(command) => command.run(),
            Commands::Connect(command) => command.run(),
            Commands::Centerline(command) => command.run(),
            Commands::Filter(command) => command.run(),
            Commands::Narrow(command) => command.run(),
            Commands::Info(command) => command.run(),
        }
    }
}
