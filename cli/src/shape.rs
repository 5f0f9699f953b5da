use dlspec_core::internal::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct ShapeArgs {
    /// Comma separated dimensions, "?" for unknown ones
    pub text: String,
    #[structopt(long = "min-rank", default_value = "0")]
    pub min_rank: usize,
    #[structopt(long = "max-rank")]
    pub max_rank: Option<usize>,
    /// Accept "?" placeholders
    #[structopt(long)]
    pub partial: bool,
    /// Reject zero-sized dimensions
    #[structopt(long)]
    pub positive: bool,
}

impl ShapeArgs {
    pub fn constraint(&self) -> DlResult<ShapeConstraint> {
        let dim_constraint =
            if self.positive { DimConstraint::Positive } else { DimConstraint::NonNegative };
        Ok(ShapeConstraint::strict()
            .with_rank(self.min_rank, self.max_rank)?
            .with_partial_allowed(self.partial)
            .with_dim_constraint(dim_constraint))
    }

    pub fn run(&self) -> DlResult<()> {
        let constraint = self.constraint()?;
        debug!("Parsing {:?} with {:?}", self.text, constraint);
        let shape = parse_shape(&self.text, &constraint)?;
        println!("shape: {shape:?}");
        if let Some(rank) = shape.rank() {
            println!("rank:  {rank}");
        }
        match shape.size() {
            Some(size) => println!("size:  {size}"),
            None => println!("size:  unknown"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(argv: &[&str]) -> ShapeArgs {
        ShapeArgs::from_iter(std::iter::once("shape").chain(argv.iter().copied()))
    }

    #[test]
    fn flags_build_the_constraint() -> DlResult<()> {
        let c = args(&["3,?", "--partial", "--positive", "--min-rank", "1", "--max-rank", "3"])
            .constraint()?;
        assert_eq!(c.min_rank(), 1);
        assert_eq!(c.max_rank(), Some(3));
        assert!(c.partial_allowed());
        assert_eq!(c.dim_constraint(), DimConstraint::Positive);
        Ok(())
    }

    #[test]
    fn inverted_rank_bounds_are_rejected() {
        assert!(args(&["3", "--min-rank", "2", "--max-rank", "1"]).constraint().is_err());
    }
}
