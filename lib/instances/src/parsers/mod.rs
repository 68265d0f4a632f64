mod csv;
pub use csv::CsvMatrixFmt;

mod weights;
pub use weights::WeightsFmt;

mod instance_dir;
pub use instance_dir::{InstanceDirFmt, DISTANCES_FILE, SERVICE_FILE, WEIGHTS_FILE};


mod nom_prelude {
  pub use nom::{
    IResult, Parser,
    error::{
      self,
      ParseError,
      context,
    },
    sequence::*,
    multi::*,
    combinator::*,
    character::complete::*,
    number::complete::double,
    Finish,
  };
}

mod common;

pub trait ParseInstance<Fmt>: Sized {
  fn parse(inputs: Fmt) -> crate::Result<Self>;
}
