use tracing::info;

use crate::{ConvertArgs, Conversion, error::ConvertError};

pub fn run(args: ConvertArgs) -> Result<Conversion, ConvertError> {
    let conversion = Conversion::detect(&args.input, &args.output)?;

    let source = conversion.source(&args.input);
    let table = source.read_table()?;

    info!(
        input = source.name(),
        output = %args.output,
        columns = table.num_columns(),
        rows = table.num_rows(),
        "converting {} to {}",
        conversion.from_format(),
        conversion.to_format()
    );

    let result = conversion.sink(&args.output).write_table(&table)?;

    info!(
        output = %result.file_written,
        rows = result.rows_written,
        "conversion finished"
    );

    Ok(conversion)
}
