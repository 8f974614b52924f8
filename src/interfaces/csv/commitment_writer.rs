use crate::domain::commitment::Commitment;
use crate::error::Result;
use std::io::Write;

/// Writes the final commitment table as CSV.
pub struct CommitmentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CommitmentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_commitments(&mut self, commitments: Vec<Commitment>) -> Result<()> {
        for commitment in commitments {
            self.writer.serialize(commitment)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use crate::domain::commitment::CommitmentState;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writer_output_shape() {
        let commitment = Commitment {
            id: 0,
            user: 20,
            deposit: Balance::new(dec!(0.975)),
            fee: Balance::new(dec!(0.025)),
            target_days: 7,
            checked_in_days: 7,
            start_date: 86_400,
            last_check_in_day: Some(6),
            loss_account: 10,
            state: CommitmentState::Completed,
            title: "Morning run".to_string(),
            settled: true,
        };

        let mut buffer = Vec::new();
        let mut writer = CommitmentWriter::new(&mut buffer);
        writer.write_commitments(vec![commitment]).unwrap();
        drop(writer);

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,user,deposit,fee,target_days,checked_in_days,start_date,last_check_in_day,loss_account,state,title,settled"
        );
        assert_eq!(
            lines.next().unwrap(),
            "0,20,0.975,0.025,7,7,86400,6,10,completed,Morning run,true"
        );
    }
}
